//! LDAP search operations.
//!
//! [`LdapDirectory`] answers [`SearchRequest`]s over a pooled LDAPS
//! connection.

use async_trait::async_trait;
use ldap3::{SearchEntry, SearchResult};
use mbr_core::{DirectoryEntry, DirectoryResult, DirectorySearch, Scope, SearchRequest};

use crate::config::LdapConfig;
use crate::connection::LdapConnectionPool;
use crate::error::{LdapError, LdapResult};

/// LDAP result code for a search base that does not exist.
const NO_SUCH_OBJECT: u32 = 32;

/// Filter used when a request carries none.
const MATCH_ALL: &str = "(objectClass=*)";

/// Directory backend over LDAPS.
pub struct LdapDirectory {
    pool: LdapConnectionPool,
}

impl LdapDirectory {
    /// Creates a directory over a new connection pool.
    ///
    /// ## Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: LdapConfig) -> LdapResult<Self> {
        config.validate()?;
        Ok(Self {
            pool: LdapConnectionPool::new(config),
        })
    }

    /// Returns the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &LdapConnectionPool {
        &self.pool
    }

    /// Tests the connection to the LDAP server.
    pub async fn test_connection(&self) -> LdapResult<()> {
        self.pool.test_connection().await
    }

    async fn run(&self, request: &SearchRequest) -> LdapResult<Option<Vec<DirectoryEntry>>> {
        let config = self.pool.config();
        let base = request.base.as_deref().unwrap_or(&config.base_dn);
        let filter = request
            .filter
            .as_ref()
            .map_or_else(|| MATCH_ALL.to_string(), ToString::to_string);
        let attributes: Vec<&str> = request.attributes.iter().map(String::as_str).collect();

        let mut conn = self.pool.get().await?;
        let outcome = conn
            .ldap_mut()
            .with_timeout(config.read_timeout)
            .search(base, to_ldap3(request.scope), &filter, attributes)
            .await;

        let SearchResult(entries, result) = match outcome {
            Ok(found) => found,
            Err(e) => {
                conn.discard().await;
                return Err(e.into());
            }
        };

        if result.rc == NO_SUCH_OBJECT {
            tracing::debug!(base = %base, "search base does not exist");
            return Ok(None);
        }
        result
            .success()
            .map_err(|e| LdapError::search(format!("Search failed: {e}")))?;

        let entries: Vec<DirectoryEntry> = entries
            .into_iter()
            .map(SearchEntry::construct)
            .map(from_search_entry)
            .collect();

        tracing::trace!(base = %base, filter = %filter, matches = entries.len(), "LDAP search");
        Ok(Some(entries))
    }
}

#[async_trait]
impl DirectorySearch for LdapDirectory {
    async fn search(&self, request: &SearchRequest) -> DirectoryResult<Option<Vec<DirectoryEntry>>> {
        Ok(self.run(request).await?)
    }
}

/// Maps a search scope to its ldap3 counterpart.
const fn to_ldap3(scope: Scope) -> ldap3::Scope {
    match scope {
        Scope::Base => ldap3::Scope::Base,
        Scope::OneLevel => ldap3::Scope::OneLevel,
        Scope::Subtree => ldap3::Scope::Subtree,
    }
}

/// Converts a raw search entry, folding attribute names to lowercase.
fn from_search_entry(entry: SearchEntry) -> DirectoryEntry {
    DirectoryEntry::from_parts(entry.dn, entry.attrs, entry.bin_attrs)
}
