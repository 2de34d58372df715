//! Time-scale modification operations.
//!
//! ## Module Organization
//!
//! - [`window`] - Window generation
//! - [`framing`] - Frame segmentation and overlap-add reconstruction
//! - [`normalization`] - Gain compensation after overlap-add
//! - [`similarity`] - Cross-correlation search used by WSOLA
//! - [`ola`], [`wsola`], [`phase_vocoder`], [`hps`] - The engines
//! - [`engine`] - Runtime strategy selection
//! - [`traits`] - The shared engine trait
//! - [`types`] - Configuration and supporting types
//!
//! ## Quick Start
//!
//! ```rust
//! use tsm_engine::operations::*;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let signal: Vec<f32> = (0..8000).map(|i| (i as f32 * 0.01).sin()).collect();
//!
//! let config = TsmConfig::new(256, 1.25);
//! let wsola = Wsola::new(&config)?;
//! let faster = wsola.run(&signal)?;
//! assert!(faster.len() < signal.len());
//!
//! // Frames can also be handled directly.
//! let frames = segment(&signal, 256, 64)?;
//! let rebuilt = reconstruct(&frames, 64)?;
//! assert!(rebuilt.len() >= signal.len());
//! # Ok(())
//! # }
//! ```

pub mod traits;
pub mod types;

pub mod engine;
pub mod framing;
pub mod hps;
pub mod normalization;
pub mod ola;
pub mod phase_vocoder;
pub mod similarity;
pub mod window;
pub mod wsola;

#[cfg(test)]
mod tests;

pub use traits::TimeScaleModification;

pub use types::{
    CorrelationMethod, DEFAULT_FRAME_SIZE, HopSizes, MIN_SYNTHESIS_HOPSIZE, NormalizationMode,
    ShiftBoundaries, TsmConfig, TsmMethod, resolve_hop_sizes,
};

pub use engine::{Tsm, time_stretch};
pub use framing::{FrameSet, frame_count, padded_length, reconstruct, segment};
pub use hps::{Components, Hps};
pub use normalization::{gain_signal, normalize, window_sum_gain};
pub use ola::Ola;
pub use phase_vocoder::PhaseVocoder;
pub use similarity::{SimilaritySearch, cross_correlation, cross_correlation_fft};
pub use window::{hann, rectangular};
pub use wsola::{AdaptiveSegmentation, Wsola};
