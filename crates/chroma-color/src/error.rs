//! Errors raised while constructing or operating on colors.

use thiserror::Error;

use crate::color::Space;

/// Error produced by color construction, conversion, or rendering.
///
/// Validation errors are raised at construction time and never silently
/// coerced into a valid value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ColorError {
    /// The input is not a six digit hex color (with or without `#`).
    #[error("invalid hex color '{0}': expected 6 hex digits with an optional '#'")]
    InvalidFormat(String),

    /// A component triple mixes integer and float values.
    #[error("color components mix integer and float values")]
    InconsistentComponents,

    /// A component falls outside the bound of its declared scale.
    #[error("{channel} component {value} is outside 0..={max}")]
    OutOfRange {
        /// Channel name (`r`, `g`, `b`, `h`, `s`, or `l`).
        channel: &'static str,
        /// Offending value, formatted as given.
        value: String,
        /// Upper bound of the channel for the declared scale.
        max: String,
    },

    /// The requested target space does not exist, or cannot be built from components.
    #[error("cannot convert to color space '{0}'")]
    UnsupportedConversion(String),

    /// The operation is not defined for the color's space.
    #[error("{operation} is not supported for {space} colors")]
    UnsupportedOperation {
        /// Name of the attempted operation.
        operation: &'static str,
        /// Space of the color the operation was attempted on.
        space: Space,
    },
}

/// A specialized [`Result`] type for color operations.
pub type Result<T> = std::result::Result<T, ColorError>;
