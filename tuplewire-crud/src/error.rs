//! Crud error types.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {}", .0.display(), .1)]
    Io(PathBuf, std::io::Error),

    #[error("failed to parse config file '{}': {}", .0.display(), .1)]
    Parse(PathBuf, String),
}

/// Errors decoding the reply of a crud call.
#[derive(Debug, Error)]
pub enum ResultError {
    /// The crud function ran and reported an error.
    #[error("crud error: {0}")]
    Crud(CrudError),

    #[error("unexpected crud reply: {0}")]
    Malformed(String),
}

/// Error object returned by crud functions as the second result value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{class_name}: {err}")]
pub struct CrudError {
    /// Error class, e.g. `CountError`.
    pub class_name: String,
    pub err: String,
    pub file: Option<String>,
    pub line: Option<u64>,
    pub stack: Option<String>,
    /// Preformatted `class_name: err`.
    pub str: Option<String>,
}
