//! Waveform-Similarity Overlap-Add (WSOLA) time-scale modification.
//!
//! WSOLA walks the input frame by frame. After taking a frame at
//! `adjusted_start`, it looks at the input that would naturally have followed
//! it (`synthesis` samples later) and searches a small window around the next
//! nominal analysis position for the displacement whose waveform matches that
//! continuation best. Only the analysis side moves; synthesis frames are still
//! overlap-added at a fixed hop.
//!
//! The walk stops as soon as either the natural continuation or the next search
//! region would run past the end of the input.

use ndarray::{Array1, Array2};
use tracing::{debug, trace};

use super::framing::{FrameSet, reconstruct, validate_frame_parameters};
use super::normalization::{is_cola_hop, normalize};
use super::similarity::SimilaritySearch;
use super::traits::TimeScaleModification;
use super::types::{HopSizes, NormalizationMode, ShiftBoundaries, TsmConfig, TsmMethod};
use super::window::hann;
use crate::{RealFloat, TsmError, TsmResult};

/// Analysis frames chosen by the similarity walk.
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptiveSegmentation<F: RealFloat> {
    /// The analysis frames, in playback order.
    pub frames: FrameSet<F>,
    /// Start of every frame in the input.
    pub starts: Vec<usize>,
    /// Displacement of every frame from its nominal position `k * analysis`.
    /// The first frame is never displaced.
    pub shifts: Vec<isize>,
}

/// Waveform-Similarity Overlap-Add engine.
///
/// Normalizes with [`NormalizationMode::WindowSum`] unless the configuration
/// overrides it.
#[derive(Debug, Clone, PartialEq)]
pub struct Wsola<F: RealFloat> {
    frame_size: usize,
    hops: HopSizes,
    synthesis_window: Array1<F>,
    normalization: NormalizationMode,
    search: SimilaritySearch,
    unit_gain: bool,
}

impl<F: RealFloat> Wsola<F> {
    /// Create a WSOLA engine with a periodic Hann synthesis window.
    ///
    /// # Errors
    /// Returns [`TsmError::InvalidConfiguration`] if the configuration is invalid.
    pub fn new(config: &TsmConfig) -> TsmResult<Self> {
        let mut engine = Self::with_window(config, hann(config.frame_size, false))?;
        engine.unit_gain = is_cola_hop(engine.frame_size, engine.hops.synthesis);
        Ok(engine)
    }

    /// Create a WSOLA engine with a custom synthesis window.
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

        let search = SimilaritySearch::new(config.boundaries(), config.correlation)?;
        let normalization = config.normalization.unwrap_or(NormalizationMode::WindowSum);
        debug!(
            frame_size = config.frame_size,
            synthesis_hopsize = hops.synthesis,
            analysis_hopsize = hops.analysis,
            boundaries = %search.boundaries(),
            ?normalization,
            "configured WSOLA engine"
        );

        Ok(Self {
            frame_size: config.frame_size,
            hops,
            synthesis_window,
            normalization,
            search,
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

    /// The similarity search used to place analysis frames.
    pub const fn search(&self) -> &SimilaritySearch {
        &self.search
    }

    /// Walk the input and choose the analysis frames.
    ///
    /// # Errors
    /// Returns [`TsmError::InvalidFrameParameters`] if the signal is shorter
    /// than one frame.
    pub fn segment_adaptive(&self, signal: &[F]) -> TsmResult<AdaptiveSegmentation<F>> {
        let frame_size = self.frame_size;
        validate_frame_parameters(signal.len(), frame_size, self.hops.analysis)?;

        let bounds = self.search.boundaries();
        let max_shift = bounds.max_shift.unsigned_abs();

        let mut starts = vec![0usize];
        let mut shifts = vec![0isize];
        let mut adjusted_start = 0usize;

        loop {
            let natural_start = adjusted_start + self.hops.synthesis;
            if natural_start + frame_size > signal.len() {
                break;
            }
            // A position past usize::MAX is past the end of any input.
            let Some(region_end) = starts
                .len()
                .checked_mul(self.hops.analysis)
                .and_then(|nominal| nominal.checked_add(max_shift + frame_size))
                .filter(|&end| end <= signal.len())
            else {
                break;
            };
            let nominal = region_end - max_shift - frame_size;

            // Near the start of the input the backwards search is clipped to index 0.
            let local = ShiftBoundaries::new(
                bounds.min_shift.max(-(nominal as isize)),
                bounds.max_shift,
            );
            let region_start = nominal - local.min_shift.unsigned_abs();

            let shift = self.search.find_best_shift_within(
                &signal[natural_start..natural_start + frame_size],
                &signal[region_start..region_end],
                local,
            )?;
            adjusted_start = nominal.saturating_add_signed(shift);

            trace!(frame = starts.len(), nominal, shift, "WSOLA step");
            starts.push(adjusted_start);
            shifts.push(shift);
        }

        let frames = Array2::from_shape_fn((starts.len(), frame_size), |(k, i)| {
            signal[starts[k] + i]
        });

        Ok(AdaptiveSegmentation {
            frames: FrameSet::from_array(frames),
            starts,
            shifts,
        })
    }
}

impl<F: RealFloat> TimeScaleModification<F> for Wsola<F> {
    fn run(&self, signal: &[F]) -> TsmResult<Vec<F>> {
        let AdaptiveSegmentation { mut frames, .. } = self.segment_adaptive(signal)?;
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
            "WSOLA run complete"
        );
        Ok(output)
    }

    fn method(&self) -> TsmMethod {
        TsmMethod::Wsola
    }

    fn hop_sizes(&self) -> HopSizes {
        self.hops
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::types::CorrelationMethod;
    use crate::utils::generation::sine_wave;
    use std::time::Duration;

    fn tone(frequency: f64, millis: u64) -> Vec<f64> {
        sine_wave(frequency, Duration::from_millis(millis), 16_000, 0.8)
    }

    #[test]
    fn test_walk_covers_the_whole_signal() {
        let signal = tone(220.0, 500);
        let wsola = Wsola::new(&TsmConfig::new(256, 2.0)).unwrap();
        let seg = wsola.segment_adaptive(&signal).unwrap();

        assert_eq!(seg.starts.len(), seg.frames.num_frames());
        assert_eq!(seg.shifts.len(), seg.starts.len());
        assert_eq!(seg.starts[0], 0);
        // The walk must progress well beyond a single step.
        assert!(seg.frames.num_frames() > 50);

        let last = *seg.starts.last().unwrap();
        let hops = wsola.hop_sizes();
        assert!(last + 256 <= signal.len());
        // Stopped because the next step no longer fits.
        let next_nominal = seg.starts.len() * hops.analysis;
        assert!(
            last + hops.synthesis + 256 > signal.len() || next_nominal + 10 + 256 > signal.len()
        );
    }

    #[test]
    fn test_shifts_respect_boundaries_and_starts_match() {
        let signal = tone(310.0, 400);
        let bounds = ShiftBoundaries::new(-7, 12);
        let config = TsmConfig::new(128, 0.75).with_shift_boundaries(bounds);
        let wsola = Wsola::new(&config).unwrap();
        let seg = wsola.segment_adaptive(&signal).unwrap();
        let analysis = wsola.hop_sizes().analysis;

        for (k, (&start, &shift)) in seg.starts.iter().zip(&seg.shifts).enumerate() {
            assert!(bounds.contains(shift));
            assert_eq!(start as isize, (k * analysis) as isize + shift);
            let frame = seg.frames.frame(k).unwrap();
            assert_eq!(frame.to_vec(), signal[start..start + 128].to_vec());
        }
    }

    #[test]
    fn test_search_tracks_the_waveform_period() {
        // 100 Hz at 16 kHz repeats every 160 samples and the search window
        // spans 161 candidates, so every step can land in phase with the
        // natural continuation. Finite frames bias the correlation peak by a
        // few samples at most.
        let signal = tone(100.0, 1000);
        let config = TsmConfig::new(256, 2.0).with_shift_boundaries(ShiftBoundaries::symmetric(80));
        let wsola = Wsola::new(&config).unwrap();
        let seg = wsola.segment_adaptive(&signal).unwrap();
        assert!(seg.starts.len() > 10);

        for pair in seg.starts.windows(2) {
            let delta = pair[1] as isize - pair[0] as isize - 64;
            let phase = delta.rem_euclid(160);
            assert!(phase <= 8 || phase >= 152, "delta {delta} is not phase aligned");
        }
    }

    #[test]
    fn test_left_search_bound_is_clipped_near_start() {
        // analysis hop of 5 places the first nominal position inside the
        // backwards search range of 10.
        let signal = tone(440.0, 100);
        let config = TsmConfig::new(64, 0.3).with_synthesis_hopsize(16);
        let wsola = Wsola::new(&config).unwrap();
        assert_eq!(wsola.hop_sizes().analysis, 5);

        let seg = wsola.segment_adaptive(&signal).unwrap();
        assert!(seg.starts.iter().all(|&s| s + 64 <= signal.len()));
        assert!(seg.shifts[1] >= -5);
    }

    #[test]
    fn test_output_length_tracks_speed_factor() {
        let signal = tone(220.0, 500);
        for &speed in &[0.5, 1.0, 1.5, 2.0] {
            let output = Wsola::new(&TsmConfig::new(256, speed))
                .unwrap()
                .run(&signal)
                .unwrap();
            let expected = signal.len() as f64 / speed;
            assert!(
                (output.len() as f64 - expected).abs() <= 2.0 * 256.0,
                "speed {speed}: got {} expected ~{expected}",
                output.len()
            );
        }
    }

    #[test]
    fn test_preserves_amplitude_in_interior() {
        let signal = tone(5.0, 1000);
        let output = Wsola::new(&TsmConfig::new(256, 1.5))
            .unwrap()
            .run(&signal)
            .unwrap();
        let interior = &output[512..output.len() - 512];
        let peak = interior.iter().fold(0.0f64, |m, x| m.max(x.abs()));
        assert!((peak - 0.8).abs() < 0.05 * 0.8, "peak {peak}");
    }

    #[test]
    fn test_fft_correlation_matches_direct_on_distinct_peaks() {
        let signal = tone(180.0, 300);
        let direct = Wsola::new(&TsmConfig::new(256, 1.25)).unwrap();
        let fft = Wsola::new(&TsmConfig::new(256, 1.25).with_correlation(CorrelationMethod::Fft))
            .unwrap();
        assert_eq!(
            direct.segment_adaptive(&signal).unwrap().starts,
            fft.segment_adaptive(&signal).unwrap().starts
        );
    }

    #[test]
    fn test_signal_of_exactly_one_frame() {
        let signal = vec![0.25f32; 256];
        let output = Wsola::new(&TsmConfig::new(256, 1.0)).unwrap().run(&signal).unwrap();
        assert_eq!(output.len(), 256);
    }

    #[test]
    fn test_silence_is_finite() {
        let signal = vec![0.0f64; 5000];
        let config = TsmConfig::new(256, 0.8).with_normalization(NormalizationMode::GainSignal);
        let output = Wsola::new(&config).unwrap().run(&signal).unwrap();
        assert!(output.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_rejects_short_signal_and_bad_boundaries() {
        let wsola = Wsola::<f64>::new(&TsmConfig::new(256, 1.0)).unwrap();
        assert!(matches!(
            wsola.run(&[0.0; 255]),
            Err(TsmError::InvalidFrameParameters(_))
        ));

        let config = TsmConfig::new(256, 1.0).with_shift_boundaries(ShiftBoundaries::new(0, -1));
        assert!(matches!(
            Wsola::<f64>::new(&config),
            Err(TsmError::InvalidConfiguration { field: "max_shift", .. })
        ));
    }

    #[test]
    fn test_huge_analysis_hop_stops_after_first_frame() {
        let signal = vec![0.1f64; 1000];
        for config in [
            TsmConfig::new(256, 1.0).with_analysis_hopsize(usize::MAX),
            TsmConfig::new(256, 1e300),
        ] {
            let wsola = Wsola::new(&config).unwrap();
            let seg = wsola.segment_adaptive(&signal).unwrap();
            assert_eq!(seg.starts, vec![0]);
            assert_eq!(wsola.run(&signal).unwrap().len(), 256);
        }
    }

    #[test]
    fn test_run_is_deterministic() {
        let signal = tone(330.0, 300);
        let wsola = Wsola::new(&TsmConfig::new(256, 0.7)).unwrap();
        let a = wsola.run(&signal).unwrap();
        let b = wsola.run(&signal).unwrap();
        assert_eq!(
            a.iter().map(|x| x.to_bits()).collect::<Vec<_>>(),
            b.iter().map(|x| x.to_bits()).collect::<Vec<_>>()
        );
    }
}
