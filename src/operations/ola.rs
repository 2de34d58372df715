//! Overlap-Add (OLA) time-scale modification.
//!
//! Frames are cut from the input every `analysis` samples, windowed, and summed
//! every `synthesis` samples. Frame boundaries ignore the signal content, so
//! tonal material picks up phase jumps ("warbling"); percussive and transient
//! material holds up well.

use ndarray::Array1;
use tracing::debug;

use super::framing::{reconstruct, segment};
use super::normalization::{is_cola_hop, normalize};
use super::traits::TimeScaleModification;
use super::types::{HopSizes, NormalizationMode, TsmConfig, TsmMethod};
use super::window::hann;
use crate::{RealFloat, TsmError, TsmResult};

/// Overlap-Add engine.
///
/// Normalizes with [`NormalizationMode::GainSignal`] unless the configuration
/// overrides it.
#[derive(Debug, Clone, PartialEq)]
pub struct Ola<F: RealFloat> {
    frame_size: usize,
    hops: HopSizes,
    synthesis_window: Array1<F>,
    normalization: NormalizationMode,
    unit_gain: bool,
}

impl<F: RealFloat> Ola<F> {
    /// Create an OLA engine with a periodic Hann synthesis window.
    ///
    /// # Errors
    /// Returns [`TsmError::InvalidConfiguration`] if the configuration is invalid.
    pub fn new(config: &TsmConfig) -> TsmResult<Self> {
        let mut engine = Self::with_window(config, hann(config.frame_size, false))?;
        engine.unit_gain = is_cola_hop(engine.frame_size, engine.hops.synthesis);
        Ok(engine)
    }

    /// Create an OLA engine with a custom synthesis window.
    ///
    /// Custom windows are always normalized, even at half-frame hops.
    ///
    /// # Errors
    /// Returns [`TsmError::InvalidConfiguration`] if the configuration is invalid
    /// or the window length differs from the frame size.
    pub fn with_window(config: &TsmConfig, synthesis_window: Array1<F>) -> TsmResult<Self> {
        config.validate()?;
        let hops = config.hop_sizes()?;
        if synthesis_window.len() != config.frame_size {
            return Err(TsmError::invalid_configuration(
                "synthesis_window",
                synthesis_window.len(),
                format!("a window of length {}", config.frame_size),
            ));
        }

        let normalization = config
            .normalization
            .unwrap_or(NormalizationMode::GainSignal);
        debug!(
            frame_size = config.frame_size,
            synthesis_hopsize = hops.synthesis,
            analysis_hopsize = hops.analysis,
            ?normalization,
            "configured OLA engine"
        );

        Ok(Self {
            frame_size: config.frame_size,
            hops,
            synthesis_window,
            normalization,
            unit_gain: false,
        })
    }

    /// Frame length in samples.
    pub const fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// The synthesis window applied to every frame.
    pub const fn synthesis_window(&self) -> &Array1<F> {
        &self.synthesis_window
    }

    /// The normalization mode in use.
    pub const fn normalization(&self) -> NormalizationMode {
        self.normalization
    }
}

impl<F: RealFloat> TimeScaleModification<F> for Ola<F> {
    fn run(&self, signal: &[F]) -> TsmResult<Vec<F>> {
        let mut frames = segment(signal, self.frame_size, self.hops.analysis)?;
        frames.apply_window(&self.synthesis_window)?;

        let mut output = reconstruct(&frames, self.hops.synthesis)?;
        normalize(
            &mut output,
            &self.synthesis_window,
            frames.num_frames(),
            self.hops.synthesis,
            self.normalization,
            self.unit_gain,
        )?;

        debug!(
            input_len = signal.len(),
            num_frames = frames.num_frames(),
            output_len = output.len(),
            "OLA run complete"
        );
        Ok(output)
    }

    fn method(&self) -> TsmMethod {
        TsmMethod::Ola
    }

    fn hop_sizes(&self) -> HopSizes {
        self.hops
    }
}
