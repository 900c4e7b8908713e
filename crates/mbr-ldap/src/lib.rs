//! # mbr-ldap
//!
//! LDAPS directory backend for membership resolution, using `ldap3`.
//!
//! [`LdapDirectory`] implements [`mbr_core::DirectorySearch`]: a search
//! whose base does not exist is reported as an absent result, other
//! failures as [`mbr_core::DirectoryError`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod connection;
pub mod error;
pub mod search;

pub use config::{LdapConfig, LdapConfigBuilder};
pub use connection::{LdapConnection, LdapConnectionPool};
pub use error::{LdapError, LdapResult};
pub use search::LdapDirectory;
