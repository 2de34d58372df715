//! Harmonic/percussive split time-scale modification.
//!
//! The input is split into a harmonic and a percussive part. The harmonic part
//! is stretched with the phase vocoder, which keeps tonal content coherent, and
//! the percussive part with OLA, which keeps transients sharp. The two results
//! are summed, the shorter one zero-extended.
//!
//! The separator is a placeholder: the whole input is treated as percussive and
//! the harmonic part is silence.

use tracing::debug;

use super::ola::Ola;
use super::phase_vocoder::PhaseVocoder;
use super::traits::TimeScaleModification;
use super::types::{HopSizes, TsmConfig, TsmMethod};
use crate::{RealFloat, TsmResult};

/// Harmonic and percussive components of a signal.
#[derive(Debug, Clone, PartialEq)]
pub struct Components<F> {
    /// Tonal, sustained content.
    pub harmonic: Vec<F>,
    /// Transient content.
    pub percussive: Vec<F>,
}

/// Harmonic/percussive split engine.
///
/// The output is as long as the longer stretched component. The phase vocoder
/// passes the harmonic part through at input length, so when speeding up the
/// result is the OLA output followed by silence up to the input length, not
/// `len / speed_factor` samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Hps<F: RealFloat> {
    harmonic: PhaseVocoder<F>,
    percussive: Ola<F>,
}

impl<F: RealFloat> Hps<F> {
    /// Create an HPS engine; both halves share `config`.
    ///
    /// # Errors
    /// Returns [`crate::TsmError::InvalidConfiguration`] if the configuration is invalid.
    pub fn new(config: &TsmConfig) -> TsmResult<Self> {
        Ok(Self {
            harmonic: PhaseVocoder::new(config)?,
            percussive: Ola::new(config)?,
        })
    }

    /// Split `signal` into harmonic and percussive components.
    ///
    /// Both components have the length of the input and sum back to it.
    pub fn separate(&self, signal: &[F]) -> Components<F> {
        Components {
            harmonic: vec![F::zero(); signal.len()],
            percussive: signal.to_vec(),
        }
    }
}

/// Sum two signals, treating the shorter one as zero past its end.
pub(crate) fn mix_zero_extended<F: RealFloat>(a: Vec<F>, b: &[F]) -> Vec<F> {
    let mut out = a;
    if out.len() < b.len() {
        out.resize(b.len(), F::zero());
    }
    for (o, &x) in out.iter_mut().zip(b) {
        *o += x;
    }
    out
}

impl<F: RealFloat> TimeScaleModification<F> for Hps<F> {
    fn run(&self, signal: &[F]) -> TsmResult<Vec<F>> {
        let Components {
            harmonic,
            percussive,
        } = self.separate(signal);

        let percussive = self.percussive.run(&percussive)?;
        let harmonic = self.harmonic.run(&harmonic)?;
        debug!(
            harmonic_len = harmonic.len(),
            percussive_len = percussive.len(),
            "HPS components stretched"
        );
        Ok(mix_zero_extended(percussive, &harmonic))
    }

    fn method(&self) -> TsmMethod {
        TsmMethod::Hps
    }

    fn hop_sizes(&self) -> HopSizes {
        TimeScaleModification::<F>::hop_sizes(&self.percussive)
    }
}
