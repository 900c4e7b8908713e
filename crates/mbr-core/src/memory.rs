//! In-memory directory.
//!
//! A [`DirectorySearch`] backend over a fixed set of entries. Useful for
//! embedding static directories and for exercising resolvers without a
//! server. Every request is recorded so callers can inspect which lookups
//! were issued.

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};

use crate::directory::{DirectorySearch, Scope, SearchRequest};
use crate::dn::{normalize_dn, parent_dn, rdn_attribute, rdn_value, split_dn};
use crate::entry::DirectoryEntry;
use crate::error::DirectoryResult;
use crate::filter::Filter;

/// Directory backed by a list of entries.
///
/// Search semantics follow a real server closely enough for resolution:
/// a base that names no entry (and has none beneath it) yields an absent
/// result, otherwise matches are returned in insertion order. Filters see
/// an entry's naming attribute (`cn=John,...` answers `(cn=John)`) even
/// when it is not stored as an attribute.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    entries: RwLock<Vec<DirectoryEntry>>,
    requests: Mutex<Vec<SearchRequest>>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, builder style.
    #[must_use]
    pub fn with_entry(self, entry: DirectoryEntry) -> Self {
        self.insert(entry);
        self
    }

    /// Adds an entry, replacing any entry with the same DN.
    pub fn insert(&self, entry: DirectoryEntry) {
        let key = normalize_dn(entry.dn());
        let mut entries = self.entries.write();
        match entries.iter_mut().find(|e| normalize_dn(e.dn()) == key) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Checks if the directory holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests whose base names the given DN.
    #[must_use]
    pub fn requests_for_base(&self, dn: &str) -> usize {
        let key = normalize_dn(dn);
        self.requests
            .lock()
            .iter()
            .filter(|r| r.base.as_deref().map(normalize_dn).as_deref() == Some(key.as_str()))
            .count()
    }

    fn in_scope(entry_dn: &str, base: &str, scope: Scope) -> bool {
        match scope {
            Scope::Base => entry_dn == base,
            Scope::OneLevel => parent_dn(entry_dn) == base,
            Scope::Subtree => {
                base.is_empty() || entry_dn == base || entry_dn.ends_with(&format!(",{base}"))
            }
        }
    }

    fn matches(filter: &Filter, entry: &DirectoryEntry) -> bool {
        if filter.matches(entry) {
            return true;
        }
        let Some(rdn) = split_dn(entry.dn()).into_iter().next() else {
            return false;
        };
        let Some(attribute) = rdn_attribute(&rdn).filter(|a| !entry.has_attr(a)) else {
            return false;
        };
        let mut named = entry.clone();
        named.insert_attr(attribute, [rdn_value(&rdn)]);
        filter.matches(&named)
    }
}

#[async_trait]
impl DirectorySearch for InMemoryDirectory {
    async fn search(
        &self,
        request: &SearchRequest,
    ) -> DirectoryResult<Option<Vec<DirectoryEntry>>> {
        self.requests.lock().push(request.clone());

        let entries = self.entries.read();
        let base = request.base.as_deref().map(normalize_dn).unwrap_or_default();

        let base_exists = base.is_empty()
            || entries
                .iter()
                .any(|e| Self::in_scope(&normalize_dn(e.dn()), &base, Scope::Subtree));
        if !base_exists {
            tracing::trace!(base = %base, "search base does not exist");
            return Ok(None);
        }

        let found: Vec<DirectoryEntry> = entries
            .iter()
            .filter(|e| Self::in_scope(&normalize_dn(e.dn()), &base, request.scope))
            .filter(|e| request.filter.as_ref().map_or(true, |f| Self::matches(f, e)))
            .map(|e| e.project(&request.attributes))
            .collect();

        tracing::trace!(base = %base, matches = found.len(), "in-memory search");
        Ok(Some(found))
    }
}
