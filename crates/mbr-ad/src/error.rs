//! Membership resolution errors.
//!
//! Not-found conditions are raised only by the initial lookup of a
//! top-level call. Missing data discovered mid-traversal ends that branch
//! instead of failing the call.

use mbr_core::DirectoryError;
use thiserror::Error;

/// Errors that can occur while resolving membership.
#[derive(Debug, Error)]
pub enum MembershipError {
    /// The user lookup returned no entry.
    #[error("User not found: {0}")]
    UidNotFound(String),

    /// The group lookup returned no entry.
    #[error("Group not found: {0}")]
    GidNotFound(String),

    /// Invalid resolver configuration.
    #[error("Membership configuration error: {0}")]
    Configuration(String),

    /// The directory backend failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

impl MembershipError {
    /// Creates a user not found error.
    #[must_use]
    pub fn uid_not_found(uid: impl Into<String>) -> Self {
        Self::UidNotFound(uid.into())
    }

    /// Creates a group not found error.
    #[must_use]
    pub fn gid_not_found(gid: impl Into<String>) -> Self {
        Self::GidNotFound(gid.into())
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Checks if this is a user or group not found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::UidNotFound(_) | Self::GidNotFound(_))
    }
}

/// Result type for membership operations.
pub type MembershipResult<T> = Result<T, MembershipError>;
