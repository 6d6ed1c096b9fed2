//! Error types for repo-ledger

use thiserror::Error;

/// Result type alias for repo-ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for repo-ledger operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Git config parsing error
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// `git clone` exited unsuccessfully
    #[error("git clone of {remote} failed with exit code {code}")]
    CloneFailed {
        /// Remote that was being cloned
        remote: String,
        /// Exit code reported by git (1 when killed by a signal)
        code: i32,
    },

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}
