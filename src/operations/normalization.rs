//! Amplitude normalization after overlap-add.
//!
//! Summing windowed frames scales the signal by the locally summed window gain.
//! [`NormalizationMode::GainSignal`] divides that gain out sample by sample,
//! [`NormalizationMode::WindowSum`] divides by its mean.

use ndarray::Array1;

use super::framing::{FrameSet, reconstruct};
use super::types::NormalizationMode;
use crate::{RealFloat, TsmResult, to_precision};

/// Returns true if a periodic Hann window of `frame_size` tiles to a constant
/// gain of exactly 1.0 at `synthesis_hopsize`.
pub const fn is_cola_hop(frame_size: usize, synthesis_hopsize: usize) -> bool {
    frame_size % 2 == 0 && synthesis_hopsize == frame_size / 2
}

/// Overlap-adds `window` once per output frame at `hopsize`.
///
/// Zero entries are replaced with 1.0 so the result can be used as a divisor.
/// Those positions carry no signal energy either, so the substitution leaves
/// them at zero.
///
/// # Errors
/// Propagates [`crate::TsmError::EmptyFrameSet`] when `num_frames` is 0.
pub fn gain_signal<F: RealFloat>(
    window: &Array1<F>,
    num_frames: usize,
    hopsize: usize,
) -> TsmResult<Vec<F>> {
    let mut gain = reconstruct(&FrameSet::tiled(window, num_frames), hopsize)?;
    for g in gain.iter_mut().filter(|g| g.is_zero()) {
        *g = F::one();
    }
    Ok(gain)
}

/// Mean overlap-add gain of `window` at `hopsize`: `sum(window) / hopsize`.
///
/// Returns 1.0 for an all-zero window.
pub fn window_sum_gain<F: RealFloat>(window: &Array1<F>, hopsize: usize) -> F {
    let gain = window.sum() / to_precision::<F, _>(hopsize);
    if gain.is_zero() { F::one() } else { gain }
}

/// Divides an overlap-added `output` by the gain of `num_frames` windows at `hopsize`.
///
/// Set `unit_gain` when the window is known to tile to exactly 1.0 at this hop;
/// the output is then returned untouched regardless of `mode`.
///
/// # Errors
/// Propagates [`crate::TsmError::EmptyFrameSet`] when `num_frames` is 0 in
/// [`NormalizationMode::GainSignal`] mode.
pub fn normalize<F: RealFloat>(
    output: &mut [F],
    window: &Array1<F>,
    num_frames: usize,
    hopsize: usize,
    mode: NormalizationMode,
    unit_gain: bool,
) -> TsmResult<()> {
    if unit_gain {
        return Ok(());
    }

    match mode {
        NormalizationMode::GainSignal => {
            let gain = gain_signal(window, num_frames, hopsize)?;
            for (sample, g) in output.iter_mut().zip(gain) {
                *sample /= g;
            }
        }
        NormalizationMode::WindowSum => {
            let gain = window_sum_gain(window, hopsize);
            for sample in output.iter_mut() {
                *sample /= gain;
            }
        }
    }
    Ok(())
}
