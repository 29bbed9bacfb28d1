//! Random number source for mine placement and guess tie-breaking.
//!
//! Uses the `rand` crate with `SmallRng` (xoshiro256++), which is fast and
//! works on WASM. Entropy is sourced from `getrandom` (browser crypto API
//! on `wasm32`, the OS elsewhere).

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// A seedable RNG wrapper.
///
/// Seed it for deterministic replay of a game, or create it from system
/// entropy.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: SmallRng,
}

impl GameRng {
    /// Create from system entropy.
    pub fn new() -> Self {
        Self {
            inner: SmallRng::from_os_rng(),
        }
    }

    /// Seeded, so a game can be replayed exactly.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    /// Seeded if a seed is given, from entropy otherwise.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::new, Self::from_seed)
    }

    /// Uniform in `[0, max)`.
    ///
    /// # Panics
    ///
    /// Panics if `max` is zero.
    #[inline(always)]
    pub fn gen_range(&mut self, max: usize) -> usize {
        self.inner.random_range(0..max)
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new()
    }
}
