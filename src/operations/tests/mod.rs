//! Tests spanning several engines.
//!
//! Unit tests live next to each engine; these exercise behaviour every
//! strategy must share and the end-to-end listening scenarios.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::types::TsmMethod;

mod property_tests;

pub(crate) const ALL_METHODS: [TsmMethod; 4] = [
    TsmMethod::Ola,
    TsmMethod::Wsola,
    TsmMethod::PhaseVocoder,
    TsmMethod::Hps,
];

/// Uniform noise in `[-1, 1)` from a fixed seed.
pub(crate) fn noise(len: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.random_range(-1.0..1.0)).collect()
}
