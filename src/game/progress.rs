//! Difficulty progression: floor counter, simple-mode counter, boss rounds,
//! and the persisted best score.

/// Mutable per-session progression counters.
///
/// `floors_cleared` resets on collapse; `simple_solved` never resets within a
/// session (the easy warm-up problems are not replayed after a collapse);
/// `best` is monotonically non-decreasing and persisted through a [`ScoreStore`].
#[derive(Debug, Clone, Default)]
pub struct ProgressionState {
    pub floors_cleared: u32,
    pub simple_solved: u32,
    pub best: u32,
}

/// Problems stay in the no-carry / no-borrow sub-mode until this many have
/// been solved.
pub const SIMPLE_MODE_LIMIT: u32 = 5;

impl ProgressionState {
    pub fn new(best: u32) -> Self {
        Self {
            floors_cleared: 0,
            simple_solved: 0,
            best,
        }
    }

    /// True when the problem about to be attempted is a boss round: every 10th
    /// floor, never the very first attempt.
    pub fn is_boss_round(&self) -> bool {
        (self.floors_cleared + 1) % 10 == 0 && self.floors_cleared > 0
    }

    /// Whether generation should still produce simple (no-carry / no-borrow)
    /// problems.
    pub fn simple_mode(&self) -> bool {
        self.simple_solved < SIMPLE_MODE_LIMIT
    }

    /// Advance after a correct answer. Both counters increment unconditionally
    /// (`simple_solved` may pass the limit; it merely stops gating). Returns
    /// `true` when a new best was set, in which case the caller persists it.
    pub fn on_correct_answer(&mut self) -> bool {
        self.floors_cleared += 1;
        self.simple_solved += 1;
        if self.floors_cleared > self.best {
            self.best = self.floors_cleared;
            true
        } else {
            false
        }
    }

    /// Reset after a collapse. Only the floor counter resets.
    pub fn on_collapse(&mut self) {
        self.floors_cleared = 0;
    }
}

/// Injected persistence for the best score. The browser build backs this with
/// `localStorage`; tests use [`MemoryScore`].
pub trait ScoreStore {
    fn load(&self) -> u32;
    fn save(&mut self, best: u32);
}

impl<S: ScoreStore + ?Sized> ScoreStore for &mut S {
    fn load(&self) -> u32 {
        (**self).load()
    }

    fn save(&mut self, best: u32) {
        (**self).save(best)
    }
}

/// In-memory store, for native tests and headless use.
#[derive(Debug, Default)]
pub struct MemoryScore {
    best: u32,
}

impl MemoryScore {
    pub fn with_best(best: u32) -> Self {
        Self { best }
    }
}

impl ScoreStore for MemoryScore {
    fn load(&self) -> u32 {
        self.best
    }

    fn save(&mut self, best: u32) {
        self.best = best;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boss_round_rule() {
        let mut p = ProgressionState::new(0);
        assert!(!p.is_boss_round(), "very first attempt is never a boss");
        p.floors_cleared = 9;
        assert!(p.is_boss_round());
        p.floors_cleared = 10;
        assert!(!p.is_boss_round());
        p.floors_cleared = 19;
        assert!(p.is_boss_round());
    }

    #[test]
    fn correct_answer_increments_both_counters() {
        let mut p = ProgressionState::new(0);
        for i in 1..=7u32 {
            p.on_correct_answer();
            assert_eq!(p.floors_cleared, i);
            assert_eq!(p.simple_solved, i);
        }
        // Past the limit the counter keeps growing but stops gating.
        assert!(!p.simple_mode());
    }

    #[test]
    fn best_updates_only_on_new_high() {
        let mut p = ProgressionState::new(2);
        assert!(!p.on_correct_answer()); // 1 <= 2
        assert!(!p.on_correct_answer()); // 2 <= 2
        assert!(p.on_correct_answer()); // 3 > 2
        assert_eq!(p.best, 3);
        p.on_collapse();
        assert_eq!(p.best, 3, "collapse must not touch the best score");
    }

    #[test]
    fn collapse_keeps_simple_counter() {
        let mut p = ProgressionState::new(0);
        for _ in 0..3 {
            p.on_correct_answer();
        }
        p.on_collapse();
        assert_eq!(p.floors_cleared, 0);
        assert_eq!(p.simple_solved, 3, "simple mode never replays mid-session");
    }

    #[test]
    fn memory_score_round_trip() {
        let mut s = MemoryScore::default();
        assert_eq!(s.load(), 0);
        s.save(12);
        assert_eq!(s.load(), 12);
    }
}
