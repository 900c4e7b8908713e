//! Directory query facade.
//!
//! Every resolver reaches the directory through [`DirectorySearch`]. The
//! contract distinguishes two empty outcomes:
//!
//! - `Ok(None)`: the search base does not exist (a distinct "not found")
//! - `Ok(Some(vec![]))`: the query is well-formed but matched nothing
//!
//! Implementations own connection handling, timeouts and any retry policy.
//! Callers never retry.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::entry::DirectoryEntry;
use crate::error::DirectoryResult;
use crate::filter::Filter;

/// Search scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scope {
    /// Only the base entry itself.
    Base,
    /// Direct children of the base.
    OneLevel,
    /// The base and its whole subtree.
    #[default]
    Subtree,
}

/// A parameterized search operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    /// Search base. `None` uses the backend's default naming context.
    pub base: Option<String>,
    /// Search scope.
    pub scope: Scope,
    /// Predicate. `None` matches any entry.
    pub filter: Option<Filter>,
    /// Requested attributes. Empty requests all user attributes.
    pub attributes: Vec<String>,
}

impl SearchRequest {
    /// Subtree search with a filter from the default base.
    #[must_use]
    pub fn filtered(filter: Filter) -> Self {
        Self {
            filter: Some(filter),
            ..Self::default()
        }
    }

    /// Base-object lookup of a single entry.
    #[must_use]
    pub fn base_object(dn: impl Into<String>) -> Self {
        Self {
            base: Some(dn.into()),
            scope: Scope::Base,
            ..Self::default()
        }
    }

    /// Sets the search base.
    #[must_use]
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Sets the search scope.
    #[must_use]
    pub const fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Sets the requested attributes.
    #[must_use]
    pub fn with_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = attributes.into_iter().map(Into::into).collect();
        self
    }
}

/// Directory query facade.
///
/// Implementations must be thread-safe. Concurrent resolutions may share
/// one facade; serializing or pooling connections is the implementation's
/// concern.
#[async_trait]
pub trait DirectorySearch: Send + Sync {
    /// Runs a search.
    ///
    /// ## Errors
    ///
    /// Returns a [`DirectoryError`](crate::DirectoryError) when the backend
    /// fails (connection, timeout, protocol). Absent and empty results are
    /// not errors.
    async fn search(&self, request: &SearchRequest)
        -> DirectoryResult<Option<Vec<DirectoryEntry>>>;
}

#[async_trait]
impl<T: DirectorySearch + ?Sized> DirectorySearch for Arc<T> {
    async fn search(
        &self,
        request: &SearchRequest,
    ) -> DirectoryResult<Option<Vec<DirectoryEntry>>> {
        (**self).search(request).await
    }
}
