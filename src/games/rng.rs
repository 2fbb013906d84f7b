//! Injected random sources for outcome resolution
//!
//! Resolvers never touch global RNG state; every draw comes from a
//! [`RandomSource`] handed in by the orchestrator. Production uses the
//! operating system entropy source, tests use a seeded or scripted source
//! so outcomes replay deterministically.

use rand::rngs::OsRng;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Source of randomness for game resolution
pub trait RandomSource: Send {
    /// Draw a uniformly distributed integer in `[min, max]` (inclusive)
    fn next_in_range(&mut self, min: i64, max: i64) -> i64;

    /// Draw a uniformly distributed value in `[0, 1)`
    fn next_unit(&mut self) -> f64;
}

/// Cryptographically-strong source backed by OS entropy
#[derive(Debug, Default)]
pub struct EntropySource;

impl EntropySource {
    pub fn new() -> Self {
        Self
    }
}

impl RandomSource for EntropySource {
    fn next_in_range(&mut self, min: i64, max: i64) -> i64 {
        debug_assert!(min <= max);
        OsRng.gen_range(min..=max)
    }

    fn next_unit(&mut self) -> f64 {
        OsRng.gen::<f64>()
    }
}

/// Deterministic source seeded from a fixed value
///
/// The same seed always yields the same draw sequence, which is what the
/// weighted-distribution and replay tests rely on.
#[derive(Debug)]
pub struct SeededSource {
    rng: ChaCha20Rng,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededSource {
    fn next_in_range(&mut self, min: i64, max: i64) -> i64 {
        debug_assert!(min <= max);
        self.rng.gen_range(min..=max)
    }

    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Scripted source that replays a fixed sequence of draws
///
/// Integer and unit draws are consumed from separate queues. When a queue
/// runs dry the source falls back to the lowest value in range / 0.0,
/// keeping exhausted scripts predictable instead of panicking mid-play.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    ints: Vec<i64>,
    units: Vec<f64>,
    int_cursor: usize,
    unit_cursor: usize,
}

impl ScriptedSource {
    pub fn new(ints: Vec<i64>, units: Vec<f64>) -> Self {
        Self {
            ints,
            units,
            int_cursor: 0,
            unit_cursor: 0,
        }
    }

    /// Script only integer draws
    pub fn with_ints(ints: Vec<i64>) -> Self {
        Self::new(ints, Vec::new())
    }

    /// Script only unit-interval draws
    pub fn with_units(units: Vec<f64>) -> Self {
        Self::new(Vec::new(), units)
    }
}

impl RandomSource for ScriptedSource {
    fn next_in_range(&mut self, min: i64, max: i64) -> i64 {
        let value = match self.ints.get(self.int_cursor) {
            Some(v) => {
                self.int_cursor += 1;
                *v
            }
            None => min,
        };
        value.clamp(min, max)
    }

    fn next_unit(&mut self) -> f64 {
        let value = match self.units.get(self.unit_cursor) {
            Some(v) => {
                self.unit_cursor += 1;
                *v
            }
            None => 0.0,
        };
        value.clamp(0.0, f64::from_bits(0x3FEF_FFFF_FFFF_FFFF)) // largest f64 < 1.0
    }
}
