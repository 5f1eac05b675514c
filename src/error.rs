//! Error types for trip-analytics operations.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while feeding or querying the streaming primitives.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// `pop`/`peek` on a heap holding no entries.
    #[error("heap is empty")]
    EmptyContainer,

    /// A median was requested before any value was added.
    #[error("no values have been added")]
    NoData,

    /// A construction parameter is out of range.
    #[error("invalid configuration for '{parameter}': {message}")]
    InvalidConfiguration {
        /// The offending parameter name.
        parameter: &'static str,
        /// Why the value was rejected.
        message: String,
    },

    /// NaN or an infinity was fed to a numeric accumulator.
    #[error("non-finite value rejected: {0}")]
    NonFiniteValue(f64),

    /// Configuration parsing error with line number.
    #[error("configuration error at line {line}: {message}")]
    ConfigParse {
        /// Line number where the error occurred (1-indexed, 0 if unknown).
        line: usize,
        /// Error message describing the issue.
        message: String,
    },

    /// Configuration file not found or unreadable.
    #[error("configuration file not found: {0}")]
    ConfigNotFound(String),
}

impl Error {
    pub(crate) fn invalid(parameter: &'static str, message: impl Into<String>) -> Self {
        let err = Self::InvalidConfiguration { parameter, message: message.into() };
        tracing::warn!(%err, "rejected configuration");
        err
    }
}

/// Rejects NaN and infinities before they reach an accumulator.
pub(crate) fn ensure_finite(value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        tracing::debug!(value, "rejected non-finite value");
        Err(Error::NonFiniteValue(value))
    }
}
