//! RNG trait abstraction for deterministic simulation
//!
//! Both the grid generator and the teleport network consume randomness
//! through [`SimRng`], so callers can inject either a seeded
//! `Xoshiro256StarStar` (reproducible runs) or `thread_rng()` (live runs).

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

/// Random number source for simulation code
///
/// Every draw bottoms out in [`SimRng::next_f32`]: ranged draws are a single
/// `[0,1)` sample scaled into `[min,max)`. That keeps the draw stream length
/// fixed even for degenerate ranges (min == max still consumes one draw),
/// which is what makes seeded generation bit-reproducible.
pub trait SimRng {
    /// Uniform f32 in [0.0, 1.0)
    fn next_f32(&mut self) -> f32;

    /// Uniform f32 in [min, max); min == max yields min
    fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Uniform index in [0, len); len must be > 0
    fn range_usize(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        let idx = (self.next_f32() * len as f32) as usize;
        idx.min(len - 1)
    }

    /// Bernoulli trial: true with the given probability
    fn check_probability(&mut self, probability: f32) -> bool {
        self.next_f32() < probability
    }
}

// Blanket implementation for any type implementing rand::Rng, covering both
// thread_rng() and seeded generators.
impl<T: ?Sized + rand::Rng> SimRng for T {
    fn next_f32(&mut self) -> f32 {
        self.gen()
    }
}

/// Seeded generator for reproducible runs
pub fn seeded(seed: u64) -> Xoshiro256StarStar {
    Xoshiro256StarStar::seed_from_u64(seed)
}
