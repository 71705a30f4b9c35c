//! Timed-transition scheduling as an explicit finite-state sequence.
//!
//! The game suspends twice: briefly after a correct answer so the success
//! message stays visible, and through a staggered top-to-bottom collapse after
//! a wrong one. Both are modeled here as deadlines checked against
//! `performance.now()` from the animation-frame tick, in the same way the
//! beat clock works in rhythm games. A single pending phase means starting a
//! new one implicitly cancels whatever was still scheduled.

/// Delay before the next problem after a correct answer.
pub const NEXT_PROBLEM_DELAY_MS: f64 = 1000.0;
/// Stagger between successive floor collapses.
pub const COLLAPSE_STEP_MS: f64 = 150.0;
/// Tail after the last floor collapses before the reset fires.
pub const RESET_TAIL_MS: f64 = 500.0;
/// Delay before regenerating when a wrong answer hits an empty building.
pub const EMPTY_RESET_DELAY_MS: f64 = 1500.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    Idle,
    /// Waiting out the success message.
    NextProblemAt(f64),
    /// Collapsing floors top to bottom; `next_floor` is the 0-based index of
    /// the next floor to drop.
    Collapsing { next_floor: usize, fire_at: f64 },
    /// All floors have dropped (or there were none); waiting to reset.
    ResetAt(f64),
}

/// Event emitted when a deadline passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseEvent {
    /// Start the collapse animation on this floor (0-based, bottom floor 0).
    CollapseFloor(usize),
    /// Clear the building, reset progression floors, generate the next problem.
    ResetBuilding,
    /// Generate the next problem after a correct answer.
    NextProblem,
}

impl Phase {
    /// Enter the post-success pause.
    pub fn after_correct(now: f64) -> Phase {
        Phase::NextProblemAt(now + NEXT_PROBLEM_DELAY_MS)
    }

    /// Enter the collapse sequence for a building of `floor_count` floors.
    pub fn after_wrong(now: f64, floor_count: usize) -> Phase {
        if floor_count == 0 {
            Phase::ResetAt(now + EMPTY_RESET_DELAY_MS)
        } else {
            Phase::Collapsing {
                next_floor: floor_count - 1,
                fire_at: now,
            }
        }
    }

    /// Advance against the clock, emitting at most one event per call. Callers
    /// tick this once per animation frame; frame spacing is far below the
    /// collapse stagger, so one event per frame keeps the sequence on time.
    pub fn advance(&mut self, now: f64) -> Option<PhaseEvent> {
        match *self {
            Phase::Idle => None,
            Phase::NextProblemAt(deadline) => {
                if now >= deadline {
                    *self = Phase::Idle;
                    Some(PhaseEvent::NextProblem)
                } else {
                    None
                }
            }
            Phase::Collapsing { next_floor, fire_at } => {
                if now < fire_at {
                    return None;
                }
                *self = if next_floor == 0 {
                    Phase::ResetAt(fire_at + RESET_TAIL_MS)
                } else {
                    Phase::Collapsing {
                        next_floor: next_floor - 1,
                        fire_at: fire_at + COLLAPSE_STEP_MS,
                    }
                };
                Some(PhaseEvent::CollapseFloor(next_floor))
            }
            Phase::ResetAt(deadline) => {
                if now >= deadline {
                    *self = Phase::Idle;
                    Some(PhaseEvent::ResetBuilding)
                } else {
                    None
                }
            }
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Phase::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_pause_fires_once_after_delay() {
        let mut phase = Phase::after_correct(1000.0);
        assert_eq!(phase.advance(1500.0), None);
        assert_eq!(phase.advance(2000.0), Some(PhaseEvent::NextProblem));
        assert!(phase.is_idle());
        assert_eq!(phase.advance(9999.0), None);
    }

    #[test]
    fn collapse_runs_top_to_bottom_then_resets() {
        let mut phase = Phase::after_wrong(0.0, 3);
        let mut events = Vec::new();
        let mut t = 0.0;
        while !phase.is_idle() {
            if let Some(e) = phase.advance(t) {
                events.push((t, e));
            }
            t += 10.0;
        }
        let fired: Vec<_> = events.iter().map(|(_, e)| *e).collect();
        assert_eq!(
            fired,
            vec![
                PhaseEvent::CollapseFloor(2),
                PhaseEvent::CollapseFloor(1),
                PhaseEvent::CollapseFloor(0),
                PhaseEvent::ResetBuilding,
            ]
        );
        // Floors drop 150ms apart; reset trails the last drop by 500ms.
        assert!(events[1].0 - events[0].0 >= COLLAPSE_STEP_MS);
        assert!(events[3].0 - events[2].0 >= RESET_TAIL_MS);
    }

    #[test]
    fn empty_building_skips_straight_to_reset() {
        let mut phase = Phase::after_wrong(100.0, 0);
        assert_eq!(phase.advance(100.0), None);
        assert_eq!(
            phase.advance(100.0 + EMPTY_RESET_DELAY_MS),
            Some(PhaseEvent::ResetBuilding)
        );
    }

    #[test]
    fn starting_a_new_phase_cancels_the_pending_one() {
        let mut phase = Phase::after_correct(0.0);
        assert_eq!(phase, Phase::NextProblemAt(NEXT_PROBLEM_DELAY_MS));
        // A wrong answer arriving before the pause elapsed replaces the phase;
        // the NextProblem event never fires.
        phase = Phase::after_wrong(10.0, 1);
        assert_eq!(phase.advance(10.0), Some(PhaseEvent::CollapseFloor(0)));
        assert_eq!(
            phase.advance(10.0 + RESET_TAIL_MS),
            Some(PhaseEvent::ResetBuilding)
        );
        assert!(phase.is_idle());
    }

    #[test]
    fn single_floor_collapse_timing() {
        let mut phase = Phase::after_wrong(0.0, 1);
        assert_eq!(phase.advance(0.0), Some(PhaseEvent::CollapseFloor(0)));
        assert_eq!(phase, Phase::ResetAt(RESET_TAIL_MS));
    }
}
