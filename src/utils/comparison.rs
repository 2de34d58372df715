//! Signal comparison utilities.
//!
//! Level and similarity measurements used to check what the engines produce.

use crate::{RealFloat, TsmError, TsmResult, to_precision};

/// Largest absolute sample value, or zero for an empty signal.
pub fn peak<F: RealFloat>(signal: &[F]) -> F {
    signal.iter().fold(F::zero(), |m, &x| m.max(x.abs()))
}

/// Computes the Pearson correlation coefficient between two signals.
///
/// The correlation coefficient ranges from -1 to 1, where:
/// - 1 indicates perfect positive correlation
/// - 0 indicates no correlation
/// - -1 indicates perfect negative correlation
///
/// A constant signal has no variance; its correlation with anything is 0.
///
/// # Errors
/// Returns [`TsmError::InvalidFrameParameters`] if the signals have different
/// lengths or are empty.
pub fn correlation<F: RealFloat>(a: &[F], b: &[F]) -> TsmResult<f64> {
    check_same_length(a, b)?;

    let n = a.len() as f64;
    let mean_a = a.iter().map(|&x| to_precision::<f64, _>(x)).sum::<f64>() / n;
    let mean_b = b.iter().map(|&x| to_precision::<f64, _>(x)).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (&x, &y) in a.iter().zip(b) {
        let da = to_precision::<f64, _>(x) - mean_a;
        let db = to_precision::<f64, _>(y) - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }

    let denom = (var_a * var_b).sqrt();
    if denom == 0.0 {
        return Ok(0.0);
    }
    Ok(cov / denom)
}

/// Computes the Mean Squared Error (MSE) between two signals.
///
/// # Errors
/// Returns [`TsmError::InvalidFrameParameters`] if the signals have different
/// lengths or are empty.
pub fn mse<F: RealFloat>(a: &[F], b: &[F]) -> TsmResult<f64> {
    check_same_length(a, b)?;
    let sum: f64 = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = to_precision::<f64, _>(x) - to_precision::<f64, _>(y);
            d * d
        })
        .sum();
    Ok(sum / a.len() as f64)
}

fn check_same_length<F>(a: &[F], b: &[F]) -> TsmResult<()> {
    if a.len() != b.len() {
        return Err(TsmError::invalid_frame_parameters(format!(
            "signals must have the same length for comparison ({} vs {})",
            a.len(),
            b.len()
        )));
    }
    if a.is_empty() {
        return Err(TsmError::invalid_frame_parameters(
            "cannot compare empty signals",
        ));
    }
    Ok(())
}
