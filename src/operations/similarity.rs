//! Cross-correlation search for the best-aligned splice point (WSOLA).
//!
//! Given the stretch of input that would naturally follow the current frame and
//! a slightly widened region around the next nominal analysis position, the
//! search picks the displacement whose waveform best matches the natural
//! continuation. Ties resolve to the lowest displacement.

use num_complex::Complex;
use rustfft::FftPlanner;

use super::types::{CorrelationMethod, ShiftBoundaries};
use crate::{RealFloat, TsmError, TsmResult, to_precision};

/// Similarity search over a bounded window of candidate shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimilaritySearch {
    boundaries: ShiftBoundaries,
    method: CorrelationMethod,
}

impl SimilaritySearch {
    /// Create a search over `boundaries` using the given correlation method.
    ///
    /// # Errors
    /// Returns [`TsmError::InvalidConfiguration`] if the boundaries are invalid.
    pub fn new(boundaries: ShiftBoundaries, method: CorrelationMethod) -> TsmResult<Self> {
        boundaries.validate()?;
        Ok(Self { boundaries, method })
    }

    /// The configured shift boundaries.
    pub const fn boundaries(&self) -> ShiftBoundaries {
        self.boundaries
    }

    /// The configured correlation method.
    pub const fn method(&self) -> CorrelationMethod {
        self.method
    }

    /// Find the shift in `[min_shift, max_shift]` that best aligns
    /// `extended_region` with `natural_progression`.
    ///
    /// `extended_region` must hold `natural_progression.len() + (max_shift - min_shift)`
    /// samples, its first sample sitting `min_shift` samples from the nominal
    /// frame start. The correlation for candidate `k` is
    /// `sum_n natural[n] * extended[n + k]` and the result is `min_shift + argmax_k`.
    ///
    /// # Errors
    /// Returns [`TsmError::InvalidFrameParameters`] if the slice lengths do not
    /// match the boundaries.
    ///
    /// # Examples
    /// ```
    /// use tsm_engine::{CorrelationMethod, ShiftBoundaries, SimilaritySearch};
    ///
    /// let search = SimilaritySearch::new(ShiftBoundaries::new(-2, 2), CorrelationMethod::Direct).unwrap();
    /// let natural = [0.0, 1.0, 0.0];
    /// // The pulse sits one sample after the nominal position.
    /// let extended = [0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0];
    /// assert_eq!(search.find_best_shift(&natural, &extended).unwrap(), 1);
    /// ```
    pub fn find_best_shift<F: RealFloat>(
        &self,
        natural_progression: &[F],
        extended_region: &[F],
    ) -> TsmResult<isize> {
        self.find_best_shift_within(natural_progression, extended_region, self.boundaries)
    }

    /// Same as [`SimilaritySearch::find_best_shift`] but over explicit bounds.
    ///
    /// Used when the configured window has been clipped at the signal edges.
    pub(crate) fn find_best_shift_within<F: RealFloat>(
        &self,
        natural_progression: &[F],
        extended_region: &[F],
        bounds: ShiftBoundaries,
    ) -> TsmResult<isize> {
        let expected = natural_progression.len() + bounds.span();
        if extended_region.len() != expected {
            return Err(TsmError::invalid_frame_parameters(format!(
                "extended region has {} samples, expected {} ({} + shift span {})",
                extended_region.len(),
                expected,
                natural_progression.len(),
                bounds.span()
            )));
        }

        let scores = match self.method {
            CorrelationMethod::Direct => cross_correlation(natural_progression, extended_region),
            CorrelationMethod::Fft => cross_correlation_fft(natural_progression, extended_region),
        };

        Ok(bounds.min_shift + first_argmax(&scores) as isize)
    }
}

impl Default for SimilaritySearch {
    fn default() -> Self {
        Self {
            boundaries: ShiftBoundaries::default(),
            method: CorrelationMethod::Direct,
        }
    }
}

/// Valid-mode cross-correlation of `template` against a longer `region`.
///
/// Returns `region.len() - template.len() + 1` values where
/// `out[k] = sum_n template[n] * region[n + k]`. A `region` shorter than
/// `template` yields an empty result.
pub fn cross_correlation<F: RealFloat>(template: &[F], region: &[F]) -> Vec<F> {
    if region.len() < template.len() {
        return Vec::new();
    }
    if template.is_empty() {
        return vec![F::zero(); region.len() + 1];
    }

    region
        .windows(template.len())
        .map(|candidate| {
            candidate
                .iter()
                .zip(template)
                .fold(F::zero(), |acc, (&r, &t)| acc + r * t)
        })
        .collect()
}

/// FFT-accelerated equivalent of [`cross_correlation`].
///
/// Computes `IFFT(conj(FFT(template)) * FFT(region))` with both inputs
/// zero-padded to the next power of two at least `region.len()`, which is long
/// enough for the valid lags to avoid circular wrap-around. Results match the
/// direct sum up to floating-point rounding.
pub fn cross_correlation_fft<F: RealFloat>(template: &[F], region: &[F]) -> Vec<F> {
    if region.len() < template.len() {
        return Vec::new();
    }
    if template.is_empty() {
        return vec![F::zero(); region.len() + 1];
    }

    let fft_len = region.len().next_power_of_two();
    let mut planner = FftPlanner::<F>::new();
    let forward = planner.plan_fft_forward(fft_len);
    let inverse = planner.plan_fft_inverse(fft_len);

    let mut template_buf = to_complex_padded(template, fft_len);
    let mut region_buf = to_complex_padded(region, fft_len);
    forward.process(&mut template_buf);
    forward.process(&mut region_buf);

    for (r, t) in region_buf.iter_mut().zip(&template_buf) {
        *r = *r * t.conj();
    }
    inverse.process(&mut region_buf);

    let scale = F::one() / to_precision::<F, _>(fft_len);
    let num_lags = region.len() - template.len() + 1;
    region_buf[..num_lags].iter().map(|c| c.re * scale).collect()
}

fn to_complex_padded<F: RealFloat>(samples: &[F], len: usize) -> Vec<Complex<F>> {
    let mut buffer = vec![Complex::new(F::zero(), F::zero()); len];
    for (dst, &src) in buffer.iter_mut().zip(samples) {
        dst.re = src;
    }
    buffer
}

/// Index of the first maximum. NaN scores never win; an all-NaN input yields 0.
fn first_argmax<F: RealFloat>(scores: &[F]) -> usize {
    let mut best_index = 0;
    let mut best = F::neg_infinity();
    for (index, &score) in scores.iter().enumerate() {
        if score > best {
            best = score;
            best_index = index;
        }
    }
    best_index
}
