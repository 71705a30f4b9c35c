//! Bounded random integer generation.
//!
//! A small LCG with explicit state so problem generation stays deterministic
//! under a fixed seed in tests. Seeded from `performance.now()` in the browser
//! (or from `getrandom` when the `rng` feature is enabled).

/// Linear congruential generator (numerical-recipes constants).
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seed from a millisecond clock reading (`performance.now()`).
    pub fn from_clock(now_ms: f64) -> Self {
        // Fold in the fractional part; performance.now() has sub-ms resolution.
        Self::new((now_ms * 1000.0) as u64 | 1)
    }

    /// Seed from OS / browser entropy when available.
    #[cfg(feature = "rng")]
    pub fn from_entropy() -> Self {
        let mut buf = [0u8; 8];
        // Fall back to a fixed odd seed if the entropy source fails.
        let seed = match getrandom::getrandom(&mut buf) {
            Ok(()) => u64::from_le_bytes(buf) | 1,
            Err(_) => 0x9e37_79b9_7f4a_7c15,
        };
        Self::new(seed)
    }

    fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(1664525)
            .wrapping_add(1013904223);
        // Discard low-order bits; they cycle quickly in an LCG.
        (self.state >> 16) as u32
    }

    /// Uniform integer in `[lo, hi]` (both inclusive). Requires `lo <= hi`.
    pub fn range_inclusive(&mut self, lo: i32, hi: i32) -> i32 {
        debug_assert!(lo <= hi);
        let span = (hi - lo) as u32 + 1;
        lo + (self.next_u32() % span) as i32
    }

    /// Uniform choice from a non-empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        debug_assert!(!items.is_empty());
        let idx = self.range_inclusive(0, items.len() as i32 - 1) as usize;
        &items[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_inclusive_stays_in_bounds() {
        let mut rng = Lcg::new(42);
        for _ in 0..1000 {
            let v = rng.range_inclusive(10, 99);
            assert!((10..=99).contains(&v), "value {v} out of [10, 99]");
        }
    }

    #[test]
    fn range_inclusive_degenerate_span() {
        let mut rng = Lcg::new(7);
        for _ in 0..20 {
            assert_eq!(rng.range_inclusive(5, 5), 5);
        }
    }

    #[test]
    fn range_inclusive_hits_both_endpoints() {
        let mut rng = Lcg::new(1);
        let mut seen_lo = false;
        let mut seen_hi = false;
        for _ in 0..2000 {
            match rng.range_inclusive(1, 5) {
                1 => seen_lo = true,
                5 => seen_hi = true,
                _ => {}
            }
        }
        assert!(seen_lo && seen_hi, "endpoints of [1, 5] never drawn");
    }

    #[test]
    fn fixed_seed_is_deterministic() {
        let mut a = Lcg::new(1234);
        let mut b = Lcg::new(1234);
        for _ in 0..50 {
            assert_eq!(a.range_inclusive(0, 1000), b.range_inclusive(0, 1000));
        }
    }

    #[test]
    fn pick_covers_all_items() {
        let mut rng = Lcg::new(99);
        let items = ["a", "b", "c"];
        let mut seen = [false; 3];
        for _ in 0..500 {
            match *rng.pick(&items) {
                "a" => seen[0] = true,
                "b" => seen[1] = true,
                _ => seen[2] = true,
            }
        }
        assert!(seen.iter().all(|s| *s));
    }
}
