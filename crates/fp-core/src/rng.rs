//! Random number generation for layout generation
//!
//! Uses a seeded ChaCha RNG so that a seed alone reproduces a layout.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Layout random number generator
///
/// Wraps ChaCha8Rng. Every stochastic step of generation draws from one
/// instance that is passed down explicitly.
/// Note: RNG state is not serialized - a deserialized RNG restarts from its seed.
#[derive(Debug, Clone)]
pub struct LayoutRng {
    rng: ChaCha8Rng,
    seed: u64,
}

// Custom serialization - only serialize seed, recreate RNG on deserialize
impl Serialize for LayoutRng {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.seed.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LayoutRng {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let seed = u64::deserialize(deserializer)?;
        Ok(LayoutRng::new(seed))
    }
}

impl LayoutRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a new RNG with a random seed
    pub fn from_entropy() -> Self {
        let seed = rand::random();
        Self::new(seed)
    }

    /// Run `f` with a fresh RNG seeded from `seed`.
    ///
    /// The RNG lives only for the duration of the call.
    pub fn with_seed<R>(seed: u64, f: impl FnOnce(&mut LayoutRng) -> R) -> R {
        let mut rng = Self::new(seed);
        f(&mut rng)
    }

    /// Get the seed used to create this RNG
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns 0..n-1, or 0 if n is 0
    pub fn rn2(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    /// Returns a value in `lo..=hi`
    ///
    /// Returns `lo` when the range is empty.
    pub fn range_inclusive(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    /// Returns true with probability 1/n
    pub fn one_in(&mut self, n: u32) -> bool {
        self.rn2(n) == 0
    }

    /// Returns true with probability `p`, clamped to `0.0..=1.0`
    pub fn chance(&mut self, p: f32) -> bool {
        if p <= 0.0 {
            return false;
        }
        if p >= 1.0 {
            return true;
        }
        self.rng.gen_range(0.0f32..1.0) < p
    }

    /// Shuffle a slice in place
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.rn2(i as u32 + 1) as usize;
            items.swap(i, j);
        }
    }
}

impl Default for LayoutRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
