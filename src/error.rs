//! Error types for experiment-index
//!
//! Every failure names the file or argument at fault so the user can fix it
//! and rerun; aggregation is cheap, nothing is retried.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// experiment-index error types
#[derive(Error, Debug)]
pub enum Error {
    /// Unrecognized command mode or malformed command arguments
    #[error("Usage error: {0}\nValid modes: {modes}", modes = crate::dispatch::VALID_MODES)]
    Usage(String),

    /// Metadata or results file exists but cannot be parsed
    #[error("Parse error in {}: {reason}", path.display())]
    Parse {
        /// Offending file
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// Index destination could not be written (no partial file is kept)
    #[error("Failed to write index {}: {source}", path.display())]
    Write {
        /// Destination path
        path: PathBuf,
        /// Underlying IO failure
        #[source]
        source: std::io::Error,
    },

    /// Invalid argument to a library operation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build a parse error for `path`.
    pub fn parse(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Parse {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this is a usage error (wrong mode or arguments).
    #[must_use]
    pub const fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }
}
