//! Error types for lrumap

use std::fmt;

/// Result type alias for lrumap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by map operations
///
/// Lookups of missing keys are not errors; they return `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An operation was called with arguments it cannot work with
    InvalidArgument(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
