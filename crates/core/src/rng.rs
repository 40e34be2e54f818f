//! Deterministic random numbers for invader fire and saucer spawns.
//!
//! A seeded LCG keeps whole sessions reproducible: the same configuration and
//! the same intent stream always produce the same game.

use arrayvec::ArrayVec;

/// Linear congruential generator (Numerical Recipes constants).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimRng {
    state: u32,
    seed: u32,
}

impl SimRng {
    pub fn new(seed: u32) -> Self {
        // A zero state would still cycle, but keep the seed visible and nonzero.
        let state = if seed == 0 { 0x9E37_79B9 } else { seed };
        Self { state, seed }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        self.state
    }

    /// Uniform value in `[0, max)`. Returns 0 when `max` is 0.
    ///
    /// Uses multiply-shift so the weak low bits of the LCG do not leak through.
    pub fn below(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// True with probability `1 / denominator`. A denominator of 0 or 1 always fires.
    pub fn one_in(&mut self, denominator: u32) -> bool {
        denominator <= 1 || self.below(denominator) == 0
    }

    /// Pick up to `count` distinct indices from `0..len`, returned in ascending order.
    pub fn sample_indices<const N: usize>(&mut self, len: usize, count: usize) -> ArrayVec<usize, N> {
        let mut out = ArrayVec::new();
        let want = count.min(len).min(N);
        // Selection sampling (Knuth's algorithm S): yields sorted output in one pass.
        let mut needed = want;
        for i in 0..len {
            if needed == 0 {
                break;
            }
            let remaining = (len - i) as u32;
            if self.below(remaining) < needed as u32 {
                out.push(i);
                needed -= 1;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SimRng::new(42);
        let mut b = SimRng::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn below_stays_in_range() {
        let mut rng = SimRng::new(7);
        for _ in 0..1000 {
            assert!(rng.below(10) < 10);
        }
        assert_eq!(rng.below(0), 0);
    }

    #[test]
    fn one_in_one_always_fires() {
        let mut rng = SimRng::new(3);
        assert!((0..50).all(|_| rng.one_in(1)));
    }

    #[test]
    fn one_in_is_roughly_calibrated() {
        let mut rng = SimRng::new(12345);
        let hits = (0..10_000).filter(|_| rng.one_in(10)).count();
        assert!((700..1300).contains(&hits), "hits = {hits}");
    }

    #[test]
    fn sample_indices_are_sorted_distinct_and_sized() {
        let mut rng = SimRng::new(99);
        for _ in 0..200 {
            let picks: ArrayVec<usize, 8> = rng.sample_indices(10, 3);
            assert_eq!(picks.len(), 3);
            assert!(picks.windows(2).all(|w| w[0] < w[1]));
            assert!(picks.iter().all(|&i| i < 10));
        }
    }

    #[test]
    fn sample_indices_caps_at_len() {
        let mut rng = SimRng::new(5);
        let picks: ArrayVec<usize, 8> = rng.sample_indices(2, 5);
        assert_eq!(picks.as_slice(), &[0, 1]);
    }

    #[test]
    fn zero_seed_is_usable() {
        let mut rng = SimRng::new(0);
        assert_eq!(rng.seed(), 0);
        assert_ne!(rng.next_u32(), rng.next_u32());
    }
}
