//! Frame segmentation and overlap-add reconstruction.
//!
//! A signal is cut into fixed-size frames whose starts are `hopsize` samples
//! apart ([`segment`]), and frames are summed back into a signal at a given hop
//! ([`reconstruct`]). Frames are stored row-wise in an [`ndarray::Array2`], one
//! row per frame, in playback order.

use ndarray::{Array1, Array2, ArrayView1, ArrayViewMut1, Axis};

use crate::{RealFloat, TsmError, TsmResult};

/// An ordered set of equally sized frames.
///
/// Row `k` of the underlying matrix is the `k`-th frame in playback order.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSet<F: RealFloat> {
    frames: Array2<F>,
}

impl<F: RealFloat> FrameSet<F> {
    /// Wraps a `(num_frames, frame_size)` matrix.
    pub const fn from_array(frames: Array2<F>) -> Self {
        Self { frames }
    }

    /// Builds a frame set holding `num_frames` copies of `frame`.
    ///
    /// Overlap-adding such a set yields the summed gain of a window tiled at a hop.
    pub fn tiled(frame: &Array1<F>, num_frames: usize) -> Self {
        Self {
            frames: Array2::from_shape_fn((num_frames, frame.len()), |(_, i)| frame[i]),
        }
    }

    /// Number of frames in the set.
    pub fn num_frames(&self) -> usize {
        self.frames.nrows()
    }

    /// Length of every frame in samples.
    pub fn frame_size(&self) -> usize {
        self.frames.ncols()
    }

    /// Returns true if the set holds no frames.
    pub fn is_empty(&self) -> bool {
        self.num_frames() == 0
    }

    /// Returns a view of the frame at `index`, or `None` if out of range.
    pub fn frame(&self, index: usize) -> Option<ArrayView1<'_, F>> {
        (index < self.num_frames()).then(|| self.frames.row(index))
    }

    /// Iterates over the frames in playback order.
    pub fn iter(&self) -> impl Iterator<Item = ArrayView1<'_, F>> {
        self.frames.axis_iter(Axis(0))
    }

    /// Borrows the underlying `(num_frames, frame_size)` matrix.
    pub const fn as_array(&self) -> &Array2<F> {
        &self.frames
    }

    /// Consumes the set and returns the underlying matrix.
    pub fn into_array(self) -> Array2<F> {
        self.frames
    }

    /// Multiplies every frame element-wise by `window`.
    ///
    /// # Errors
    /// Returns [`TsmError::InvalidFrameParameters`] if the window length differs
    /// from the frame size.
    pub fn apply_window(&mut self, window: &Array1<F>) -> TsmResult<()> {
        if window.len() != self.frame_size() {
            return Err(TsmError::invalid_frame_parameters(format!(
                "window length {} does not match frame size {}",
                window.len(),
                self.frame_size()
            )));
        }
        // Broadcasts the window across every row.
        self.frames *= window;
        Ok(())
    }
}

/// Checks that `frame_size` frames at `hopsize` can be cut from `signal_length` samples.
pub(crate) fn validate_frame_parameters(
    signal_length: usize,
    frame_size: usize,
    hopsize: usize,
) -> TsmResult<()> {
    if frame_size == 0 {
        return Err(TsmError::invalid_frame_parameters(
            "frame size must be greater than 0",
        ));
    }
    if hopsize == 0 {
        return Err(TsmError::invalid_frame_parameters(
            "hop size must be greater than 0",
        ));
    }
    if frame_size > signal_length {
        return Err(TsmError::invalid_frame_parameters(format!(
            "frame size {frame_size} exceeds signal length {signal_length}"
        )));
    }
    Ok(())
}

/// Length of the signal after zero-padding its tail so the last frame lands exactly.
///
/// The result satisfies `(padded - frame_size) % hopsize == 0` and is the
/// smallest such length not below `signal_length`. When `hopsize == frame_size`
/// this pads up to the end of the next full hop.
///
/// Returns `None` if `frame_size` or `hopsize` is zero, if `frame_size` exceeds
/// `signal_length`, or if the padded length does not fit in a `usize`.
pub const fn padded_length(
    signal_length: usize,
    frame_size: usize,
    hopsize: usize,
) -> Option<usize> {
    if frame_size == 0 || hopsize == 0 || frame_size > signal_length {
        return None;
    }
    match (signal_length - frame_size) % hopsize {
        0 => Some(signal_length),
        residual => signal_length.checked_add(hopsize - residual),
    }
}

/// Number of frames [`segment`] produces for the given parameters.
///
/// # Errors
/// Returns [`TsmError::InvalidFrameParameters`] under the same conditions as [`segment`].
pub fn frame_count(signal_length: usize, frame_size: usize, hopsize: usize) -> TsmResult<usize> {
    validate_frame_parameters(signal_length, frame_size, hopsize)?;
    let padded = padded_length(signal_length, frame_size, hopsize).ok_or_else(|| {
        TsmError::invalid_frame_parameters(format!(
            "hop size {hopsize} pads a {signal_length}-sample signal past usize::MAX"
        ))
    })?;
    Ok((padded - frame_size) / hopsize + 1)
}

/// Splits a signal into frames of `frame_size` samples spaced `hopsize` apart.
///
/// If the signal does not end exactly on a frame boundary, it is treated as
/// zero-padded up to [`padded_length`], so the final real samples always end up
/// in the last frame instead of being dropped.
///
/// # Errors
/// Returns [`TsmError::InvalidFrameParameters`] if `frame_size` or `hopsize`
/// is zero, or if `frame_size` exceeds the signal length.
///
/// # Examples
/// ```
/// use tsm_engine::segment;
///
/// let signal = [1.0f64, 2.0, 3.0, 4.0, 5.0];
/// let frames = segment(&signal, 4, 2).unwrap();
/// assert_eq!(frames.num_frames(), 2);
/// assert_eq!(frames.frame(1).unwrap().to_vec(), vec![3.0, 4.0, 5.0, 0.0]);
/// ```
pub fn segment<F: RealFloat>(
    signal: &[F],
    frame_size: usize,
    hopsize: usize,
) -> TsmResult<FrameSet<F>> {
    let num_frames = frame_count(signal.len(), frame_size, hopsize)?;

    let frames = Array2::from_shape_fn((num_frames, frame_size), |(k, i)| {
        signal.get(k * hopsize + i).copied().unwrap_or_else(F::zero)
    });

    Ok(FrameSet::from_array(frames))
}

/// Overlap-adds frames spaced `hopsize` apart into a single signal.
///
/// The output has length `(num_frames - 1) * hopsize + frame_size` and frame
/// `k` is accumulated into it starting at `k * hopsize`. Overlapping regions sum.
///
/// # Errors
/// - [`TsmError::EmptyFrameSet`] if `frames` holds no frames.
/// - [`TsmError::InvalidFrameParameters`] if `hopsize` is zero.
pub fn reconstruct<F: RealFloat>(frames: &FrameSet<F>, hopsize: usize) -> TsmResult<Vec<F>> {
    if frames.is_empty() {
        return Err(TsmError::EmptyFrameSet);
    }
    if hopsize == 0 {
        return Err(TsmError::invalid_frame_parameters(
            "hop size must be greater than 0",
        ));
    }

    let frame_size = frames.frame_size();
    let output_length = (frames.num_frames() - 1) * hopsize + frame_size;
    let mut output = vec![F::zero(); output_length];

    for (k, frame) in frames.iter().enumerate() {
        let start = k * hopsize;
        let mut target = ArrayViewMut1::from(&mut output[start..start + frame_size]);
        target += &frame;
    }

    Ok(output)
}
