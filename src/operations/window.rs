//! Window functions for frame-based analysis and synthesis.

use ndarray::Array1;

use crate::{RealFloat, to_precision};

/// Generates Hann (Hanning) window coefficients.
///
/// With `symmetric = true` the classic symmetric window is produced, whose
/// first and last coefficients are equal:
///
/// ```text
/// w[i] = 0.5 * (1 - cos(2πi / (N - 1)))
/// ```
///
/// With `symmetric = false` the periodic window is produced. Its right-hand zero
/// lies one sample past the end, so hop-spaced copies tile without counting the
/// endpoint twice. This is the form used for overlap-add:
///
/// ```text
/// w[i] = 0.5 * (1 - cos(2πi / N))
/// ```
///
/// A length of 1 yields `[0.0]` and a length of 0 yields an empty window.
///
/// # Examples
/// ```
/// use tsm_engine::hann;
///
/// let w = hann::<f64>(8, true);
/// assert_eq!(w[0], w[7]);
/// ```
pub fn hann<F: RealFloat>(length: usize, symmetric: bool) -> Array1<F> {
    if length <= 1 {
        return Array1::zeros(length);
    }

    let denominator: F = if symmetric {
        to_precision(length - 1)
    } else {
        to_precision(length)
    };
    let half: F = to_precision(0.5);
    let two_pi = F::TAU();

    Array1::from_shape_fn(length, |i| {
        let phase = two_pi * to_precision::<F, _>(i) / denominator;
        half * (F::one() - phase.cos())
    })
}

/// Generates a rectangular (all-ones) window.
///
/// Windowing with it leaves frames untouched, so overlap-adding rectangular
/// frames just counts how many frames cover each sample.
pub fn rectangular<F: RealFloat>(length: usize) -> Array1<F> {
    Array1::ones(length)
}
