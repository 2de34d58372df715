//! Error types and result utilities for time-scale modification.

use thiserror::Error;

/// Convenience type alias for results that may contain a [`TsmError`].
pub type TsmResult<T> = Result<T, TsmError>;

/// Error types that can occur while configuring or running a TSM engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TsmError {
    /// A configuration value is outside its valid range.
    ///
    /// Raised eagerly when an engine is constructed, before any signal is touched.
    #[error("Invalid configuration: {field} = {value}, expected {expected}")]
    InvalidConfiguration {
        /// Name of the offending configuration field.
        field: &'static str,
        /// The rejected value, rendered as text.
        value: String,
        /// Description of the valid range.
        expected: String,
    },

    /// Frame size or hop size cannot be applied to the given input.
    ///
    /// This happens when the frame is longer than the signal, a hop size is zero,
    /// or the slices handed to the similarity search have inconsistent lengths.
    #[error("Invalid frame parameters: {0}")]
    InvalidFrameParameters(String),

    /// Overlap-add reconstruction was asked to combine zero frames.
    ///
    /// Segmentation always yields at least one frame, so this indicates an
    /// internal consistency failure rather than bad user input.
    #[error("Cannot reconstruct a signal from an empty frame set")]
    EmptyFrameSet,
}

impl TsmError {
    /// Create a new invalid configuration error.
    pub fn invalid_configuration(
        field: &'static str,
        value: impl ToString,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidConfiguration {
            field,
            value: value.to_string(),
            expected: expected.into(),
        }
    }

    /// Create a new invalid frame parameters error.
    pub fn invalid_frame_parameters(message: impl Into<String>) -> Self {
        Self::InvalidFrameParameters(message.into())
    }

    /// Returns true if the error was caused by the caller's configuration or input.
    ///
    /// [`TsmError::EmptyFrameSet`] is the only variant that signals a bug in the
    /// processing pipeline itself.
    pub const fn is_input_error(&self) -> bool {
        !matches!(self, Self::EmptyFrameSet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_configuration_message_names_field_and_range() {
        let err = TsmError::invalid_configuration("synthesis_hopsize", 4, "a value in [10, 256]");
        let msg = err.to_string();
        assert!(msg.contains("synthesis_hopsize"));
        assert!(msg.contains('4'));
        assert!(msg.contains("[10, 256]"));
    }

    #[test]
    fn test_error_classification() {
        assert!(TsmError::invalid_frame_parameters("frame too long").is_input_error());
        assert!(TsmError::invalid_configuration("frame_size", 0, "> 0").is_input_error());
        assert!(!TsmError::EmptyFrameSet.is_input_error());
    }
}
