//! Error types for model construction and parsing.

use thiserror::Error;

/// Errors raised while building or parsing model values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Text is not a day-first date literal.
    #[error("invalid date literal '{0}': expected dd.mm.yyyy")]
    InvalidDate(String),

    /// Day/month/year combination does not exist on the calendar.
    #[error("date out of range: {0}")]
    DateOutOfRange(String),

    /// Unknown enum literal (status, role, severity).
    #[error("unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
