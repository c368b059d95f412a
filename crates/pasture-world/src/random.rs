//! Injectable source of randomness.
//!
//! Every random draw in the simulation goes through a [`RandomSource`], so a
//! run is reproducible under a fixed seed and tests can pin the outcome of
//! each draw.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Uniform integer draws.
pub trait RandomSource {
    /// Draw an integer uniformly from `min..=max`.
    ///
    /// The bounds may be given in either order.
    fn range_inclusive(&mut self, min: i32, max: i32) -> i32;

    /// Roughly even odds: true when a draw from `0..=100` exceeds 50.
    fn coin_flip(&mut self) -> bool {
        self.range_inclusive(0, 100) > 50
    }
}

/// Seeded pseudo-random source for simulation runs.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    seed: u64,
    rng: SmallRng,
}

impl SeededRandom {
    /// Create a source seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// The seed this source was created with.
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn range_inclusive(&mut self, min: i32, max: i32) -> i32 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.rng.random_range(lo..=hi)
    }
}

/// Source that always returns the same value, clamped into the requested
/// range.
///
/// `FixedRandom::new(100)` makes every [`RandomSource::coin_flip`] succeed;
/// `FixedRandom::new(0)` makes every one fail.
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom {
    value: i32,
}

impl FixedRandom {
    /// Create a source pinned to `value`.
    pub const fn new(value: i32) -> Self {
        Self { value }
    }
}

impl RandomSource for FixedRandom {
    fn range_inclusive(&mut self, min: i32, max: i32) -> i32 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.value.clamp(lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SeededRandom::new(7);
        let mut b = SeededRandom::new(7);
        for _ in 0..50 {
            assert_eq!(a.range_inclusive(0, 1000), b.range_inclusive(0, 1000));
        }
    }

    #[test]
    fn draws_stay_in_range_with_swapped_bounds() {
        let mut rng = SeededRandom::new(1);
        for _ in 0..200 {
            let v = rng.range_inclusive(10, -10);
            assert!((-10..=10).contains(&v));
        }
    }

    #[test]
    fn fixed_source_clamps() {
        let mut rng = FixedRandom::new(100);
        assert_eq!(rng.range_inclusive(1, 5), 5);
        assert!(rng.coin_flip());
        assert!(!FixedRandom::new(0).coin_flip());
        assert!(!FixedRandom::new(50).coin_flip());
    }
}
