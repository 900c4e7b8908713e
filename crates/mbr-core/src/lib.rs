//! # mbr-core
//!
//! Directory model and query primitives shared by the membership crates.
//!
//! This crate provides the leaf components every resolver builds on:
//!
//! - [`DirectoryEntry`] - a read-only directory record
//! - [`DirectorySearch`] - the query facade contract implemented by backends
//! - [`Filter`] - typed search predicates rendered to RFC 4515 text
//! - [`dn`] - distinguished-name splitting with escape handling
//! - [`Sid`] - security identifier binary/text codec
//! - [`InMemoryDirectory`] - a facade implementation backed by a `Vec`

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod directory;
pub mod dn;
pub mod entry;
pub mod error;
pub mod filter;
pub mod memory;
pub mod sid;

pub use directory::{DirectorySearch, Scope, SearchRequest};
pub use entry::DirectoryEntry;
pub use error::{DirectoryError, DirectoryResult};
pub use filter::Filter;
pub use memory::InMemoryDirectory;
pub use sid::{Sid, SidError};
