//! CLI error type.

use thiserror::Error;

/// Errors surfaced by the command-line driver.
#[derive(Debug, Error)]
pub enum CliError {
    /// An engine rejected its inputs or failed numerically.
    #[error("pricing failed: {0}")]
    Pricing(#[from] qr_core::Error),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding a report as JSON failed.
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A command-line argument is inconsistent with the others.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
