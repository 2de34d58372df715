// Correctness and logic
#![warn(clippy::unit_cmp)] // Detects comparing unit types
#![warn(clippy::match_same_arms)]
// Duplicate match arms

// Performance-focused
#![warn(clippy::inefficient_to_string)] // `format!("{}", x)` vs `x.to_string()`
#![warn(clippy::map_clone)] // Cloning inside `map()` unnecessarily
#![warn(clippy::unnecessary_to_owned)] // Detects redundant `.to_owned()` or `.clone()`
#![warn(clippy::large_stack_arrays)] // Helps avoid stack overflows
#![warn(clippy::needless_collect)] // Avoids `.collect().iter()` chains

// Style and idiomatic Rust
#![warn(clippy::redundant_clone)] // Detects unnecessary `.clone()`
#![warn(clippy::identity_op)] // e.g., `x + 0`, `x * 1`
#![warn(clippy::needless_return)] // Avoids `return` at the end of functions
#![warn(clippy::manual_map)] // Use `.map()` instead of manual `match`
#![warn(clippy::unwrap_used)] // Avoids using `unwrap()`

// Maintainability
#![warn(clippy::missing_panics_doc)] // Docs for functions that might panic
#![warn(clippy::missing_const_for_fn)] // Suggests making eligible functions `const`
#![deny(missing_docs)] // Documentation is a must for release

//! # tsm_engine
//!
//! Time-Scale Modification (TSM) for single-channel audio: change how long a
//! signal plays without changing its pitch.
//!
//! ## Overview
//!
//! The crate is a pure transform. A complete in-memory signal goes in, a newly
//! allocated signal comes out, and nothing is read from or written to disk.
//! Two time-domain algorithms are implemented:
//!
//! - **OLA** (Overlap-Add): frames are cut from the input at a fixed analysis hop,
//!   windowed and summed at a fixed synthesis hop. Good for percussive material.
//! - **WSOLA** (Waveform-Similarity Overlap-Add): like OLA, but every analysis
//!   frame may be displaced within a small search window so that it lines up
//!   with the waveform that would naturally have followed the previous frame.
//!
//! The phase vocoder and harmonic/percussive strategies are exposed under the
//! same contract as extension points.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use tsm_engine::{TimeScaleModification, TsmConfig, Ola, sine_wave};
//!
//! # fn main() -> Result<(), tsm_engine::TsmError> {
//! let signal: Vec<f64> = sine_wave(5.0, Duration::from_secs(1), 8000, 1.0);
//! let config = TsmConfig::new(256, 2.0);
//! let ola = Ola::new(&config)?;
//!
//! let faster = ola.run(&signal)?;
//! assert!(faster.len() < signal.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Choosing an algorithm at runtime
//!
//! ```rust
//! use tsm_engine::{Tsm, TsmConfig, TsmMethod, TimeScaleModification};
//!
//! # fn main() -> Result<(), tsm_engine::TsmError> {
//! let signal = vec![0.25f32; 4096];
//! let engine = Tsm::new(TsmMethod::Wsola, &TsmConfig::new(256, 0.5))?;
//! let slower = engine.run(&signal)?;
//! assert!(slower.len() > signal.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Configuration problems are reported when an engine is built, frame problems
//! when it runs:
//!
//! ```rust
//! use tsm_engine::{Ola, TsmConfig, TsmError};
//!
//! let err = Ola::<f64>::new(&TsmConfig::new(256, 1.0).with_synthesis_hopsize(4)).unwrap_err();
//! assert!(matches!(err, TsmError::InvalidConfiguration { field: "synthesis_hopsize", .. }));
//! ```
//!
//! ## Logging
//!
//! Engines emit `tracing` events (`debug` per run, `trace` per WSOLA step).
//! The library never installs a subscriber.

mod error;
pub mod operations;
pub mod utils;

use std::fmt::{Debug, Display};
use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

pub use crate::error::{TsmError, TsmResult};
pub use crate::operations::{
    AdaptiveSegmentation, CorrelationMethod, FrameSet, HopSizes, Hps, NormalizationMode, Ola,
    PhaseVocoder, ShiftBoundaries, SimilaritySearch, TimeScaleModification, Tsm, TsmConfig,
    TsmMethod, Wsola, hann, rectangular, reconstruct, resolve_hop_sizes, segment, time_stretch,
};
pub use crate::utils::{
    comparison::{correlation, peak},
    generation::{silence, sine_wave},
};

use ndarray::ScalarOperand;
use num_traits::{Float, FloatConst, NumCast};
use rustfft::FftNum;

/// Marker trait for real floating-point sample types (f32, f64).
pub trait RealFloat:
    Float
    + FloatConst
    + NumCast
    + FftNum
    + ScalarOperand
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + Default
    + Display
    + Debug
{
}

impl RealFloat for f32 {}
impl RealFloat for f64 {}

/// Casts a numeric value into the target floating-point type `F`.
///
/// Abstracts over floating-point precision in generic code so that the same
/// implementation serves both `f32` and `f64` without explicit `as` casts.
///
/// # Examples
/// ```
/// use tsm_engine::to_precision;
///
/// let value_f32: f32 = to_precision(42usize);
/// assert_eq!(value_f32, 42.0);
/// ```
///
/// # Panics
/// Panics if the numeric conversion fails, which cannot happen for the
/// integer and float inputs used in this crate.
#[inline(always)]
pub fn to_precision<F, T>(value: T) -> F
where
    F: RealFloat,
    T: NumCast,
{
    NumCast::from(value).expect("safe_cast: valid numeric conversion")
}
