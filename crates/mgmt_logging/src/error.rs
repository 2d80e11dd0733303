//! Logging configuration errors.

use thiserror::Error;

/// Errors raised while interpreting resolved handler values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoggingError {
    /// The level name is not a known level.
    #[error("unknown level '{0}'")]
    UnknownLevel(String),

    /// The suffix contains no date or time pattern letter.
    #[error("suffix '{0}' has no date pattern")]
    NoDatePattern(String),

    /// The suffix opens a quoted section it never closes.
    #[error("suffix '{0}' has an unterminated quote")]
    UnterminatedQuote(String),

    /// The `file` value has no `path`.
    #[error("file has no path")]
    MissingPath,
}
