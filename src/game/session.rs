//! Session object tying the engine together: operation selection, progression
//! counters, building, RNG, injected score store, and the current problem.
//! This is the whole mutable game state; the presentation layer holds exactly
//! one of these and sequences it from input events and timer expiries.

use super::building::{Building, BuildingLayout};
use super::evaluate::{self, Outcome};
use super::problem::{self, OperationSelection, Problem};
use super::progress::{ProgressionState, ScoreStore};
use super::rng::Lcg;

pub struct Session<S: ScoreStore> {
    selection: OperationSelection,
    progression: ProgressionState,
    building: Building,
    rng: Lcg,
    store: S,
    problem: Problem,
}

impl<S: ScoreStore> Session<S> {
    /// Load the persisted best score and generate the opening problem.
    pub fn new(selection: OperationSelection, mut rng: Lcg, store: S) -> Self {
        let progression = ProgressionState::new(store.load());
        let problem = problem::generate(selection, &progression, &mut rng);
        Self {
            selection,
            progression,
            building: Building::new(),
            rng,
            store,
            problem,
        }
    }

    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    pub fn problem_text(&self) -> String {
        self.problem.display_text()
    }

    pub fn hint_text(&self) -> String {
        self.problem.hint_text()
    }

    pub fn floors_cleared(&self) -> u32 {
        self.progression.floors_cleared
    }

    pub fn best(&self) -> u32 {
        self.progression.best
    }

    /// True while the pending problem is a generation-time boss round; drives
    /// the boss-mode visual flag.
    pub fn is_boss_round(&self) -> bool {
        self.progression.is_boss_round()
    }

    pub fn building(&self) -> &Building {
        &self.building
    }

    pub fn layout(&self) -> BuildingLayout {
        self.building.layout()
    }

    /// Evaluate raw input against the current problem. On `Correct` the
    /// progression advances, a new best is persisted, and a floor is appended;
    /// the current problem stays in place until [`Session::next_problem`] (the
    /// caller shows the success message first). `Incorrect` and `NotANumber`
    /// change nothing here — a collapse is applied via [`Session::collapse`]
    /// once its animation has played out.
    pub fn answer(&mut self, raw: &str) -> Outcome {
        let outcome = evaluate::evaluate(raw, &self.problem);
        if outcome == Outcome::Correct {
            if self.progression.on_correct_answer() {
                self.store.save(self.progression.best);
            }
            self.building.append_floor(self.progression.floors_cleared);
        }
        outcome
    }

    /// Apply the post-collapse reset: floors to zero, building cleared, fresh
    /// problem. The simple-mode counter survives.
    pub fn collapse(&mut self) {
        self.progression.on_collapse();
        self.building.reset();
        self.regenerate();
    }

    /// Replace the current problem (after the success pause, or after a
    /// selection change).
    pub fn next_problem(&mut self) {
        self.regenerate();
    }

    /// Toggle addition. Refused (returns `false`, selection unchanged) when it
    /// would leave no operation enabled.
    pub fn set_addition(&mut self, enabled: bool) -> bool {
        if !enabled && !self.selection.subtraction {
            return false;
        }
        self.selection.addition = enabled;
        true
    }

    /// Toggle subtraction, with the same non-empty guarantee.
    pub fn set_subtraction(&mut self, enabled: bool) -> bool {
        if !enabled && !self.selection.addition {
            return false;
        }
        self.selection.subtraction = enabled;
        true
    }

    pub fn selection(&self) -> OperationSelection {
        self.selection
    }

    fn regenerate(&mut self) {
        self.problem = problem::generate(self.selection, &self.progression, &mut self.rng);
    }
}
