//! Debug log error types.

use thiserror::Error;

/// Errors that can occur while loading, parsing or rewriting a debug log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogError {
    #[error("source unavailable: {path}: {reason}")]
    SourceUnavailable { path: String, reason: String },

    #[error("source too large: {path} is {bytes} bytes (limit {limit})")]
    SourceTooLarge { path: String, bytes: u64, limit: u64 },

    #[error("malformed line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("{0}")]
    Other(String),
}

/// Convenience alias for debug log results.
pub type LogResult<T> = Result<T, LogError>;
