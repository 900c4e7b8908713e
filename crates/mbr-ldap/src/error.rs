//! LDAP-specific error types.
//!
//! ## Security Note
//!
//! Error messages must not leak sensitive information like
//! passwords or bind credentials.

use mbr_core::DirectoryError;
use thiserror::Error;

/// LDAP-specific errors.
#[derive(Debug, Error)]
pub enum LdapError {
    /// Invalid configuration.
    #[error("LDAP configuration error: {0}")]
    Configuration(String),

    /// Connection URL must use LDAPS.
    #[error("Security error: Only LDAPS is supported. URL must start with 'ldaps://'. STARTTLS and plain LDAP are not allowed.")]
    InsecureProtocol,

    /// Connection failed.
    #[error("LDAP connection failed: {0}")]
    Connection(String),

    /// Service account bind failed.
    #[error("LDAP bind failed: {0}")]
    Bind(String),

    /// Search operation failed.
    #[error("LDAP search failed: {0}")]
    Search(String),

    /// Timeout error.
    #[error("LDAP operation timed out")]
    Timeout,

    /// Pool exhausted.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Underlying ldap3 error.
    #[error("LDAP error: {0}")]
    Ldap3(#[source] ldap3::LdapError),
}

impl LdapError {
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
}

impl From<ldap3::LdapError> for LdapError {
    fn from(err: ldap3::LdapError) -> Self {
        match err {
            ldap3::LdapError::Timeout { .. } => Self::Timeout,
            other => Self::Ldap3(other),
        }
    }
}

/// Result type for LDAP operations.
pub type LdapResult<T> = Result<T, LdapError>;

impl From<LdapError> for DirectoryError {
    fn from(err: LdapError) -> Self {
        match err {
            LdapError::Configuration(msg) => Self::config(msg),
            LdapError::InsecureProtocol => Self::config(err.to_string()),
            LdapError::Connection(msg) | LdapError::Bind(msg) => Self::connection(msg),
            LdapError::Search(msg) => Self::search(msg),
            LdapError::Timeout => Self::timeout("LDAP operation"),
            LdapError::PoolExhausted => Self::connection("Connection pool exhausted"),
            LdapError::Ldap3(e) => Self::Protocol(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ldap3_timeout_becomes_timeout() {
        let elapsed = tokio::time::timeout(std::time::Duration::ZERO, std::future::pending::<()>())
            .await
            .unwrap_err();
        let err: LdapError = ldap3::LdapError::Timeout { elapsed }.into();
        assert!(matches!(err, LdapError::Timeout));

        let err: LdapError = ldap3::LdapError::EndOfStream.into();
        assert!(matches!(err, LdapError::Ldap3(_)));
        let err: DirectoryError = err.into();
        assert!(matches!(err, DirectoryError::Protocol(_)));
    }

    #[test]
    fn insecure_protocol_message() {
        let msg = LdapError::InsecureProtocol.to_string();
        assert!(msg.contains("LDAPS"));
        assert!(msg.contains("STARTTLS"));
    }

    #[test]
    fn converts_to_directory_error() {
        let err: DirectoryError = LdapError::Timeout.into();
        assert!(matches!(err, DirectoryError::Timeout(_)));
        assert!(err.is_connection_error());

        let err: DirectoryError = LdapError::connection("refused").into();
        assert!(matches!(err, DirectoryError::Connection(msg) if msg == "refused"));

        let err: DirectoryError = LdapError::Bind("invalid credentials".to_string()).into();
        assert!(matches!(err, DirectoryError::Connection(_)));

        let err: DirectoryError = LdapError::InsecureProtocol.into();
        assert!(matches!(err, DirectoryError::Configuration(msg) if msg.contains("ldaps://")));
    }
}
