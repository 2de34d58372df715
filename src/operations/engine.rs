//! Strategy selection.
//!
//! [`Tsm`] wraps every engine behind one value so callers can pick the strategy
//! at runtime, and [`time_stretch`] builds and runs one in a single call.

use super::hps::Hps;
use super::ola::Ola;
use super::phase_vocoder::PhaseVocoder;
use super::traits::TimeScaleModification;
use super::types::{HopSizes, TsmConfig, TsmMethod};
use super::wsola::Wsola;
use crate::{RealFloat, TsmResult};

/// Any time-scale modification engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Tsm<F: RealFloat> {
    /// Overlap-Add.
    Ola(Ola<F>),
    /// Waveform-Similarity Overlap-Add.
    Wsola(Wsola<F>),
    /// Phase vocoder.
    PhaseVocoder(PhaseVocoder<F>),
    /// Harmonic/percussive split.
    Hps(Hps<F>),
}

impl<F: RealFloat> Tsm<F> {
    /// Build the engine for `method`.
    ///
    /// # Errors
    /// Returns [`crate::TsmError::InvalidConfiguration`] if the configuration is invalid.
    pub fn new(method: TsmMethod, config: &TsmConfig) -> TsmResult<Self> {
        Ok(match method {
            TsmMethod::Ola => Self::Ola(Ola::new(config)?),
            TsmMethod::Wsola => Self::Wsola(Wsola::new(config)?),
            TsmMethod::PhaseVocoder => Self::PhaseVocoder(PhaseVocoder::new(config)?),
            TsmMethod::Hps => Self::Hps(Hps::new(config)?),
        })
    }

    fn engine(&self) -> &dyn TimeScaleModification<F> {
        match self {
            Self::Ola(e) => e,
            Self::Wsola(e) => e,
            Self::PhaseVocoder(e) => e,
            Self::Hps(e) => e,
        }
    }
}

impl<F: RealFloat> TimeScaleModification<F> for Tsm<F> {
    fn run(&self, signal: &[F]) -> TsmResult<Vec<F>> {
        self.engine().run(signal)
    }

    fn method(&self) -> TsmMethod {
        self.engine().method()
    }

    fn hop_sizes(&self) -> HopSizes {
        self.engine().hop_sizes()
    }
}

/// Time-scale `signal` with `method`.
///
/// # Errors
/// Returns [`crate::TsmError::InvalidConfiguration`] for an invalid configuration
/// and [`crate::TsmError::InvalidFrameParameters`] for a signal shorter than one frame.
///
/// # Examples
/// ```
/// use tsm_engine::{TsmConfig, TsmMethod, time_stretch};
///
/// let signal = vec![0.5f32; 4096];
/// let slower = time_stretch(&signal, TsmMethod::Ola, &TsmConfig::new(256, 0.5)).unwrap();
/// assert!(slower.len() > signal.len());
/// ```
pub fn time_stretch<F: RealFloat>(
    signal: &[F],
    method: TsmMethod,
    config: &TsmConfig,
) -> TsmResult<Vec<F>> {
    Tsm::new(method, config)?.run(signal)
}
