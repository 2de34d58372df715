//! Signal generation utilities.
//!
//! Mono test signals as plain sample vectors, for examples, tests and quick
//! experiments with the engines.

use std::time::Duration;

use num_traits::FloatConst;

use crate::{RealFloat, to_precision};

fn sample_count(duration: Duration, sample_rate: u32) -> usize {
    (duration.as_secs_f64() * f64::from(sample_rate)).round() as usize
}

/// Generates a sine wave with the specified parameters.
///
/// # Arguments
/// * `frequency` - Frequency of the sine wave in Hz
/// * `duration` - Duration of the signal
/// * `sample_rate` - Sample rate in Hz
/// * `amplitude` - Peak amplitude
///
/// # Returns
/// `round(duration * sample_rate)` samples of `amplitude * sin(2 pi f t)`.
/// A zero `sample_rate` yields an empty signal.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use tsm_engine::sine_wave;
///
/// let tone: Vec<f32> = sine_wave(440.0, Duration::from_millis(10), 48_000, 0.5);
/// assert_eq!(tone.len(), 480);
/// assert_eq!(tone[0], 0.0);
/// ```
pub fn sine_wave<F: RealFloat>(
    frequency: F,
    duration: Duration,
    sample_rate: u32,
    amplitude: F,
) -> Vec<F> {
    let num_samples = sample_count(duration, sample_rate);
    let sample_rate_f = to_precision::<F, _>(sample_rate);
    let omega = <F as FloatConst>::TAU() * frequency;

    (0..num_samples)
        .map(|i| {
            let t = to_precision::<F, _>(i) / sample_rate_f;
            amplitude * (omega * t).sin()
        })
        .collect()
}

/// Generates `round(duration * sample_rate)` samples of silence.
pub fn silence<F: RealFloat>(duration: Duration, sample_rate: u32) -> Vec<F> {
    vec![F::zero(); sample_count(duration, sample_rate)]
}
