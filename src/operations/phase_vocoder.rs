//! Phase vocoder time-scale modification.
//!
//! The engine is registered so every strategy can be selected through the same
//! interface, but spectral processing is not wired in yet: `run` returns an
//! unmodified copy of the input and logs a warning.

use std::marker::PhantomData;

use tracing::warn;

use super::traits::TimeScaleModification;
use super::types::{HopSizes, TsmConfig, TsmMethod};
use crate::{RealFloat, TsmResult};

/// Phase vocoder engine (pass-through).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseVocoder<F: RealFloat> {
    frame_size: usize,
    hops: HopSizes,
    _marker: PhantomData<F>,
}

impl<F: RealFloat> PhaseVocoder<F> {
    /// Create a phase vocoder engine.
    ///
    /// # Errors
    /// Returns [`crate::TsmError::InvalidConfiguration`] if the configuration is invalid.
    pub fn new(config: &TsmConfig) -> TsmResult<Self> {
        config.validate()?;
        Ok(Self {
            frame_size: config.frame_size,
            hops: config.hop_sizes()?,
            _marker: PhantomData,
        })
    }

    /// Frame length in samples.
    pub const fn frame_size(&self) -> usize {
        self.frame_size
    }
}

impl<F: RealFloat> TimeScaleModification<F> for PhaseVocoder<F> {
    fn run(&self, signal: &[F]) -> TsmResult<Vec<F>> {
        warn!(
            input_len = signal.len(),
            speed_factor = self.hops.effective_speed(),
            "phase vocoder is not implemented, returning the input unchanged"
        );
        Ok(signal.to_vec())
    }

    fn method(&self) -> TsmMethod {
        TsmMethod::PhaseVocoder
    }

    fn hop_sizes(&self) -> HopSizes {
        self.hops
    }
}
