//! Configuration and supporting types for time-scale modification.

use std::fmt;

use crate::{TsmError, TsmResult};

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// Smallest synthesis hop size accepted by the engines.
pub const MIN_SYNTHESIS_HOPSIZE: usize = 10;

/// Frame size used by [`TsmConfig::default`].
pub const DEFAULT_FRAME_SIZE: usize = 256;

/// Bounds on how far an analysis frame may be displaced from its nominal position.
///
/// Negative shifts move the frame earlier in the input, positive shifts later.
/// Invariant: `min_shift <= 0 <= max_shift`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct ShiftBoundaries {
    /// Largest backwards displacement, in samples (`<= 0`).
    pub min_shift: isize,
    /// Largest forwards displacement, in samples (`>= 0`).
    pub max_shift: isize,
}

impl ShiftBoundaries {
    /// Create new shift boundaries. Use [`ShiftBoundaries::validate`] to check them.
    pub const fn new(min_shift: isize, max_shift: isize) -> Self {
        Self {
            min_shift,
            max_shift,
        }
    }

    /// Create boundaries symmetric around zero: `[-radius, radius]`.
    pub const fn symmetric(radius: usize) -> Self {
        Self::new(-(radius as isize), radius as isize)
    }

    /// Number of samples the search window adds to a frame: `max_shift - min_shift`.
    pub const fn span(&self) -> usize {
        self.max_shift.abs_diff(self.min_shift)
    }

    /// Number of candidate shifts: `span() + 1`.
    pub const fn candidates(&self) -> usize {
        self.span() + 1
    }

    /// Returns true if `shift` lies within `[min_shift, max_shift]`.
    pub const fn contains(&self, shift: isize) -> bool {
        self.min_shift <= shift && shift <= self.max_shift
    }

    /// Validate the boundaries.
    ///
    /// # Errors
    /// Returns [`TsmError::InvalidConfiguration`] if `min_shift > 0` or `max_shift < 0`.
    pub fn validate(&self) -> TsmResult<()> {
        if self.min_shift > 0 {
            return Err(TsmError::invalid_configuration(
                "min_shift",
                self.min_shift,
                "a value <= 0",
            ));
        }
        if self.max_shift < 0 {
            return Err(TsmError::invalid_configuration(
                "max_shift",
                self.max_shift,
                "a value >= 0",
            ));
        }
        Ok(())
    }
}

impl Default for ShiftBoundaries {
    fn default() -> Self {
        Self::new(-10, 10)
    }
}

impl fmt::Display for ShiftBoundaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Min Shift: {} Max Shift: {}", self.min_shift, self.max_shift)
    }
}

/// How the overlap-added output is corrected for the summed window gain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum NormalizationMode {
    /// Divide sample-wise by the overlap-added window ("gain signal").
    ///
    /// Exact everywhere, including the ramps at both ends of the output.
    GainSignal,
    /// Divide every sample by one scalar, the mean overlap gain
    /// `sum(window) / synthesis_hopsize`.
    ///
    /// Cheaper, exact in the interior for Hann windows when the frame size is a
    /// multiple of the hop, and approximate otherwise.
    WindowSum,
}

/// How cross-correlation is evaluated during the similarity search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum CorrelationMethod {
    /// Direct time-domain sum, `O(frame_size * candidates)`.
    #[default]
    Direct,
    /// FFT-based correlation using `rustfft`, worthwhile for wide search windows.
    Fft,
}

/// Available time-scale modification strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum TsmMethod {
    /// Overlap-Add.
    Ola,
    /// Waveform-Similarity Overlap-Add.
    Wsola,
    /// Phase vocoder (pass-through placeholder).
    PhaseVocoder,
    /// Harmonic/percussive separation, combining the phase vocoder and OLA.
    Hps,
}

impl TsmMethod {
    /// Short display name of the strategy.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Ola => "OLA",
            Self::Wsola => "WSOLA",
            Self::PhaseVocoder => "PV",
            Self::Hps => "HPS",
        }
    }
}

impl fmt::Display for TsmMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolved hop sizes, in samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct HopSizes {
    /// Distance between frame starts in the output timeline.
    pub synthesis: usize,
    /// Distance between frame starts in the input timeline.
    pub analysis: usize,
}

impl HopSizes {
    /// The effective speed change `analysis / synthesis`.
    ///
    /// May differ slightly from the requested speed factor because the analysis
    /// hop is rounded to whole samples.
    pub fn effective_speed(&self) -> f64 {
        self.analysis as f64 / self.synthesis as f64
    }
}

/// Configuration shared by every TSM strategy.
///
/// Optional fields fall back to defaults when the configuration is resolved:
/// the synthesis hop defaults to `frame_size / 4`, the analysis hop to
/// `round(synthesis_hopsize * speed_factor)` and the shift boundaries to `[-10, 10]`.
///
/// # Examples
/// ```
/// use tsm_engine::{ShiftBoundaries, TsmConfig};
///
/// let config = TsmConfig::new(512, 1.25)
///     .with_synthesis_hopsize(128)
///     .with_shift_boundaries(ShiftBoundaries::symmetric(32));
///
/// let hops = config.hop_sizes().unwrap();
/// assert_eq!(hops.synthesis, 128);
/// assert_eq!(hops.analysis, 160);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct TsmConfig {
    /// Frame length in samples. Powers of two are typical but not required.
    pub frame_size: usize,
    /// Playback speed: `< 1` slows down (longer output), `> 1` speeds up.
    pub speed_factor: f64,
    /// Synthesis hop override; must lie in `[10, frame_size]`.
    pub synthesis_hopsize: Option<usize>,
    /// Analysis hop override; must be greater than 0.
    pub analysis_hopsize: Option<usize>,
    /// Search window for WSOLA.
    pub shift_boundaries: Option<ShiftBoundaries>,
    /// Normalization override; each strategy has its own default.
    pub normalization: Option<NormalizationMode>,
    /// Cross-correlation evaluation used by WSOLA.
    pub correlation: CorrelationMethod,
}

impl TsmConfig {
    /// Create a configuration with the given frame size and speed factor.
    pub const fn new(frame_size: usize, speed_factor: f64) -> Self {
        Self {
            frame_size,
            speed_factor,
            synthesis_hopsize: None,
            analysis_hopsize: None,
            shift_boundaries: None,
            normalization: None,
            correlation: CorrelationMethod::Direct,
        }
    }

    /// Override the synthesis hop size.
    pub const fn with_synthesis_hopsize(mut self, hopsize: usize) -> Self {
        self.synthesis_hopsize = Some(hopsize);
        self
    }

    /// Override the analysis hop size.
    pub const fn with_analysis_hopsize(mut self, hopsize: usize) -> Self {
        self.analysis_hopsize = Some(hopsize);
        self
    }

    /// Set the WSOLA search window.
    pub const fn with_shift_boundaries(mut self, boundaries: ShiftBoundaries) -> Self {
        self.shift_boundaries = Some(boundaries);
        self
    }

    /// Override the normalization mode.
    pub const fn with_normalization(mut self, mode: NormalizationMode) -> Self {
        self.normalization = Some(mode);
        self
    }

    /// Set the cross-correlation method.
    pub const fn with_correlation(mut self, method: CorrelationMethod) -> Self {
        self.correlation = method;
        self
    }

    /// Shift boundaries, falling back to the default `[-10, 10]`.
    pub fn boundaries(&self) -> ShiftBoundaries {
        self.shift_boundaries.unwrap_or_default()
    }

    /// Resolve the hop sizes for this configuration. See [`resolve_hop_sizes`].
    ///
    /// # Errors
    /// See [`resolve_hop_sizes`].
    pub fn hop_sizes(&self) -> TsmResult<HopSizes> {
        resolve_hop_sizes(self)
    }

    /// Validate every field of the configuration.
    ///
    /// # Errors
    /// Returns [`TsmError::InvalidConfiguration`] naming the first offending field.
    pub fn validate(&self) -> TsmResult<()> {
        resolve_hop_sizes(self)?;
        self.boundaries().validate()
    }
}

impl Default for TsmConfig {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_SIZE, 1.0)
    }
}

/// Resolve synthesis and analysis hop sizes from a configuration.
///
/// - `synthesis = synthesis_hopsize.unwrap_or(frame_size / 4)`, required to lie in `[10, frame_size]`.
/// - `analysis = analysis_hopsize.unwrap_or(round(synthesis * speed_factor))`, required to be `> 0`.
///
/// # Errors
/// Returns [`TsmError::InvalidConfiguration`] if `frame_size` is 0, if
/// `speed_factor` is not a positive finite number, or if either hop falls
/// outside its range.
pub fn resolve_hop_sizes(config: &TsmConfig) -> TsmResult<HopSizes> {
    if config.frame_size == 0 {
        return Err(TsmError::invalid_configuration(
            "frame_size",
            config.frame_size,
            "a value > 0",
        ));
    }
    if !(config.speed_factor.is_finite() && config.speed_factor > 0.0) {
        return Err(TsmError::invalid_configuration(
            "speed_factor",
            config.speed_factor,
            "a finite value > 0",
        ));
    }

    let synthesis = config.synthesis_hopsize.unwrap_or(config.frame_size / 4);
    if !(MIN_SYNTHESIS_HOPSIZE..=config.frame_size).contains(&synthesis) {
        return Err(TsmError::invalid_configuration(
            "synthesis_hopsize",
            synthesis,
            format!("a value in [{MIN_SYNTHESIS_HOPSIZE}, {}]", config.frame_size),
        ));
    }

    let analysis = match config.analysis_hopsize {
        Some(hopsize) => hopsize,
        None => (synthesis as f64 * config.speed_factor).round() as usize,
    };
    if analysis == 0 {
        return Err(TsmError::invalid_configuration(
            "analysis_hopsize",
            analysis,
            "a value > 0",
        ));
    }

    Ok(HopSizes {
        synthesis,
        analysis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_hops() {
        let hops = TsmConfig::new(256, 2.0).hop_sizes().unwrap();
        assert_eq!(hops, HopSizes { synthesis: 64, analysis: 128 });
        assert_eq!(hops.effective_speed(), 2.0);
    }

    #[test]
    fn test_analysis_hop_is_rounded() {
        let hops = TsmConfig::new(256, 1.5)
            .with_synthesis_hopsize(25)
            .hop_sizes()
            .unwrap();
        // 37.5 rounds half away from zero
        assert_eq!(hops.analysis, 38);

        let hops = TsmConfig::new(256, 0.33).hop_sizes().unwrap();
        assert_eq!(hops.analysis, 21);
    }

    #[test]
    fn test_explicit_analysis_hop_wins() {
        let hops = TsmConfig::new(256, 3.0)
            .with_analysis_hopsize(50)
            .hop_sizes()
            .unwrap();
        assert_eq!(hops.synthesis, 64);
        assert_eq!(hops.analysis, 50);
    }

    #[test]
    fn test_synthesis_hop_bounds() {
        let err = TsmConfig::new(256, 1.0)
            .with_synthesis_hopsize(9)
            .hop_sizes()
            .unwrap_err();
        assert!(matches!(
            err,
            TsmError::InvalidConfiguration { field: "synthesis_hopsize", .. }
        ));
        assert!(err.to_string().contains("[10, 256]"));

        assert!(TsmConfig::new(256, 1.0).with_synthesis_hopsize(10).validate().is_ok());
        assert!(TsmConfig::new(256, 1.0).with_synthesis_hopsize(256).validate().is_ok());
        assert!(TsmConfig::new(256, 1.0).with_synthesis_hopsize(257).validate().is_err());

        // default synthesis hop of a tiny frame falls below the minimum
        assert!(TsmConfig::new(32, 1.0).validate().is_err());
    }

    #[test]
    fn test_rejects_bad_frame_size_and_speed() {
        assert!(matches!(
            TsmConfig::new(0, 1.0).validate(),
            Err(TsmError::InvalidConfiguration { field: "frame_size", .. })
        ));
        for speed in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                TsmConfig::new(256, speed).validate(),
                Err(TsmError::InvalidConfiguration { field: "speed_factor", .. })
            ));
        }
    }

    #[test]
    fn test_analysis_hop_rounding_to_zero_is_rejected() {
        let err = TsmConfig::new(256, 0.001).validate().unwrap_err();
        assert!(matches!(
            err,
            TsmError::InvalidConfiguration { field: "analysis_hopsize", .. }
        ));
    }

    #[test]
    fn test_shift_boundaries_validation() {
        assert!(ShiftBoundaries::default().validate().is_ok());
        assert!(ShiftBoundaries::new(0, 0).validate().is_ok());
        assert!(matches!(
            ShiftBoundaries::new(1, 5).validate(),
            Err(TsmError::InvalidConfiguration { field: "min_shift", .. })
        ));
        assert!(matches!(
            ShiftBoundaries::new(-5, -1).validate(),
            Err(TsmError::InvalidConfiguration { field: "max_shift", .. })
        ));

        let config = TsmConfig::new(256, 1.0).with_shift_boundaries(ShiftBoundaries::new(3, 4));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_shift_boundaries_span() {
        let b = ShiftBoundaries::new(-10, 6);
        assert_eq!(b.span(), 16);
        assert_eq!(b.candidates(), 17);
        assert!(b.contains(-10) && b.contains(6) && !b.contains(7));
        assert_eq!(ShiftBoundaries::symmetric(4), ShiftBoundaries::new(-4, 4));
        assert_eq!(b.to_string(), "Min Shift: -10 Max Shift: 6");
    }

    #[test]
    fn test_method_names() {
        assert_eq!(TsmMethod::Wsola.to_string(), "WSOLA");
        assert_eq!(TsmMethod::PhaseVocoder.name(), "PV");
    }
}
