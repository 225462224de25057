//! Error types for widget construction and configuration.

use crate::color::ColorParseError;
use thiserror::Error;

/// Errors raised at widget API boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WidgetError {
    /// A constructor or setter argument was rejected.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A color string could not be parsed.
    #[error("invalid color {input:?}: {source}")]
    InvalidColor {
        input: String,
        #[source]
        source: ColorParseError,
    },

    /// Name-based dispatch asked for an operation the widget does not have.
    #[error("'{type_name}' object has no operation '{operation}'")]
    NoSuchOperation {
        type_name: &'static str,
        operation: String,
    },
}

impl WidgetError {
    /// Shorthand for [`WidgetError::InvalidArgument`].
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Parse a color, attaching the offending input on failure.
///
/// # Errors
///
/// Returns [`WidgetError::InvalidColor`] if `input` is not a color.
pub fn parse_color(input: &str) -> Result<crate::Color, WidgetError> {
    crate::Color::parse(input).map_err(|source| WidgetError::InvalidColor {
        input: input.to_string(),
        source,
    })
}
