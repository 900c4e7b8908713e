//! Directory facade error types.
//!
//! ## Security Note
//!
//! Error messages must not leak bind credentials. Backends should report
//! the failing operation, not the secrets used to perform it.

use thiserror::Error;

/// Errors raised by a [`DirectorySearch`](crate::DirectorySearch) backend.
///
/// "No such entry" is not an error: searches report it as an absent or
/// empty result instead.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Invalid backend configuration.
    #[error("Directory configuration error: {0}")]
    Configuration(String),

    /// Connection to the directory failed.
    #[error("Directory connection error: {0}")]
    Connection(String),

    /// The search operation was rejected or failed.
    #[error("Directory search failed: {0}")]
    Search(String),

    /// The operation exceeded its deadline.
    #[error("Directory operation timed out: {0}")]
    Timeout(String),

    /// Protocol-level error reported by the server.
    #[error("Directory protocol error: {0}")]
    Protocol(String),
}

impl DirectoryError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a search error.
    #[must_use]
    pub fn search(msg: impl Into<String>) -> Self {
        Self::Search(msg.into())
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::Timeout(operation.into())
    }

    /// Checks if this is a connection-related error.
    #[must_use]
    pub const fn is_connection_error(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout(_))
    }
}

/// Result type for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;
