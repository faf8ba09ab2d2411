//! Error types for dynfilter CLI operations.

use std::io;
use thiserror::Error;

/// The error type for dynfilter CLI operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The filter or context input could not be read.
    #[error("Invalid input: {0}")]
    Input(String),

    /// Filter resolution failed.
    #[error(transparent)]
    Filter(#[from] dynfilter::Error),
}

/// A specialized Result type for dynfilter CLI operations.
pub type Result<T> = std::result::Result<T, Error>;
