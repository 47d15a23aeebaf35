//! Injectable randomness.
//!
//! Everything random in the game (fishing durations and outcomes, wood drop
//! counts, shelter variants, tree scatter) draws through [`RandomSource`] so
//! tests can substitute a fixed sequence.

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Source of uniform random draws.
pub trait RandomSource {
    /// Uniform draw in `[0, 1)`.
    fn next_unit(&mut self) -> f32;

    /// Uniform draw in `[min, max)`. Returns `min` when the range is empty.
    fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        min + (max - min) * self.next_unit()
    }

    /// Uniform integer draw in `[min, max]` (inclusive).
    fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        let width = max - min;
        let span = f64::from(width) + 1.0;
        let offset = (f64::from(self.next_unit()) * span) as u64;
        min + offset.min(u64::from(width)) as u32
    }

    /// Uniform index into a collection of `len` elements. `len` must be non-zero.
    fn pick_index(&mut self, len: usize) -> usize {
        let idx = (self.next_unit() * len as f32) as usize;
        idx.min(len.saturating_sub(1))
    }
}

/// Seeded pseudo-random source used by live sessions.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Reproducible source from a seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Source seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_unit(&mut self) -> f32 {
        (**self).next_unit()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_unit(&mut self) -> f32 {
        (**self).next_unit()
    }
}
