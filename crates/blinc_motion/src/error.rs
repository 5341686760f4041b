//! Motion error types

use thiserror::Error;

/// Errors raised while constructing or composing animations
///
/// Every variant describes a configuration mistake caught at construction or
/// insertion time. Sampling never fails.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MotionError {
    /// Duration must be finite and strictly positive
    #[error("Invalid duration: {0} (must be finite and > 0)")]
    InvalidDuration(f64),

    /// Decay rate must lie in (0, 1)
    #[error("Invalid decay rate: {0} (must be in (0, 1))")]
    InvalidRate(f64),

    /// `Repeat::Count(0)` never plays
    #[error("Invalid loop count: must be at least 1")]
    InvalidLoopCount,

    /// A numeric parameter is out of range
    #[error("Invalid parameter `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    /// Timeline position refers to a label that was never declared
    #[error("Unknown timeline label: {0}")]
    UnknownLabel(String),

    /// Timeline position text could not be parsed
    #[error("Invalid timeline position: {0:?}")]
    InvalidPosition(String),

    /// PIP flick needs at least one anchor
    #[error("PIP flick requires at least one anchor")]
    EmptyAnchors,

    /// The two axes of a 2D animation must share a loop configuration
    #[error("2D animation axes have different loop configurations")]
    AxisMismatch,

    /// The requested change does not apply to this kind of animation
    #[error("Kind mismatch: expected {expected}, found {found}")]
    KindMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

/// Result type for motion operations
pub type Result<T> = std::result::Result<T, MotionError>;

/// Reject non-finite values for a named parameter
pub(crate) fn ensure_finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(MotionError::InvalidParameter { name, value })
    }
}

/// Reject negative or non-finite values for a named parameter
pub(crate) fn ensure_non_negative(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(MotionError::InvalidParameter { name, value })
    }
}

/// Validate a duration in seconds
pub(crate) fn ensure_duration(duration: f64) -> Result<()> {
    if duration.is_finite() && duration > 0.0 {
        Ok(())
    } else {
        Err(MotionError::InvalidDuration(duration))
    }
}
