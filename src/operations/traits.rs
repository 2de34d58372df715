//! Core trait shared by every time-scale modification strategy.

use super::types::{HopSizes, TsmMethod};
use crate::{RealFloat, TsmResult};

/// A time-scale modification strategy.
///
/// Implementations are pure: `run` never mutates the engine, so identical input
/// and configuration always produce bit-identical output, and one engine may be
/// shared across threads.
pub trait TimeScaleModification<F: RealFloat> {
    /// Time-scale `signal`, returning a newly allocated signal.
    ///
    /// The output length is approximately `signal.len() / speed_factor`.
    ///
    /// # Errors
    /// Returns [`crate::TsmError::InvalidFrameParameters`] if the signal is
    /// shorter than one frame.
    fn run(&self, signal: &[F]) -> TsmResult<Vec<F>>;

    /// Which strategy this is.
    fn method(&self) -> TsmMethod;

    /// The resolved hop sizes.
    fn hop_sizes(&self) -> HopSizes;
}
