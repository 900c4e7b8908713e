//! Directory lookups used by the membership resolvers.
//!
//! The traversals themselves live in [`user_groups`](crate::user_groups),
//! [`group_users`](crate::group_users) and
//! [`primary_group`](crate::primary_group) as further `impl` blocks of
//! [`AdMemberService`].

use std::sync::Arc;

use mbr_core::dn::{normalize_dn, rdn_attribute, rdn_value, split_dn};
use mbr_core::filter::{class_name_filter, dn_filter, group_filter, name_filter};
use mbr_core::{DirectoryEntry, DirectorySearch, SearchRequest};

use crate::config::AdConfig;
use crate::error::{MembershipError, MembershipResult};

/// Membership queries against an Active Directory.
///
/// The service holds no traversal state: every top-level call owns its
/// own visited set, so one service may serve concurrent callers.
#[derive(Debug, Clone)]
pub struct AdMemberService<D> {
    directory: D,
    config: Arc<AdConfig>,
}

impl<D: DirectorySearch> AdMemberService<D> {
    /// Creates a member service over a directory.
    ///
    /// ## Errors
    ///
    /// Returns [`MembershipError::Configuration`] if the configuration is
    /// invalid.
    pub fn new(directory: D, config: AdConfig) -> MembershipResult<Self> {
        config.validate()?;
        Ok(Self {
            directory,
            config: Arc::new(config),
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &AdConfig {
        &self.config
    }

    /// Returns the underlying directory.
    #[must_use]
    pub const fn directory(&self) -> &D {
        &self.directory
    }

    pub(crate) async fn search(
        &self,
        request: &SearchRequest,
    ) -> MembershipResult<Option<Vec<DirectoryEntry>>> {
        self.directory.search(request).await.map_err(|e| {
            if e.is_connection_error() {
                tracing::warn!(error = %e, "directory unreachable");
            }
            e.into()
        })
    }

    /// Finds a user entry by account name.
    ///
    /// ## Errors
    ///
    /// Returns [`MembershipError::UidNotFound`] if the search result is
    /// absent or empty.
    pub async fn find_user(&self, uid: &str) -> MembershipResult<DirectoryEntry> {
        let mut request =
            SearchRequest::filtered(name_filter(&self.config.login_attribute, uid));
        if let Some(base) = &self.config.user_base {
            request = request.with_base(base.clone());
        }

        self.search(&request)
            .await?
            .and_then(|entries| entries.into_iter().next())
            .ok_or_else(|| {
                tracing::debug!(uid = %uid, "user not found");
                MembershipError::uid_not_found(uid)
            })
    }

    /// Finds a group entry by name, including its primary group token.
    ///
    /// ## Errors
    ///
    /// Returns [`MembershipError::GidNotFound`] if the search result is
    /// absent or empty.
    pub async fn find_group(&self, gid: &str) -> MembershipResult<DirectoryEntry> {
        let request = SearchRequest::filtered(group_filter(&self.config.group_name_attribute, gid))
            .with_base(self.config.group_base.clone())
            .with_attributes(["*", self.config.primary_group_token_attribute.as_str()]);

        self.search(&request)
            .await?
            .and_then(|entries| entries.into_iter().next())
            .ok_or_else(|| {
                tracing::debug!(gid = %gid, "group not found");
                MembershipError::gid_not_found(gid)
            })
    }

    /// Finds a nestable group by name.
    ///
    /// Unlike [`find_group`](Self::find_group), the object class may be any
    /// of the configured group classes, so an organizational unit listed
    /// there is found too.
    ///
    /// ## Errors
    ///
    /// Returns [`MembershipError::GidNotFound`] if the search result is
    /// absent or empty.
    pub async fn find_nested_group(&self, name: &str) -> MembershipResult<DirectoryEntry> {
        let filter = class_name_filter(
            &self.config.group_name_attribute,
            name,
            &self.config.group_classes,
        );
        let request = SearchRequest::filtered(filter)
            .with_base(self.config.group_base.clone())
            .with_attributes(["*", self.config.primary_group_token_attribute.as_str()]);

        self.search(&request)
            .await?
            .and_then(|entries| entries.into_iter().next())
            .ok_or_else(|| {
                tracing::debug!(group = %name, "nested group not found");
                MembershipError::gid_not_found(name)
            })
    }

    /// Looks up entries by distinguished name.
    ///
    /// The leading RDN becomes an equality filter (escaped delimiters are
    /// unescaped, so `cn=Bar\, Foo` searches for `Bar, Foo`) and the
    /// remaining components become the search base. Returns `None` when
    /// the directory reports the base as absent or the DN is empty.
    ///
    /// ## Errors
    ///
    /// Only directory failures are returned as errors.
    pub async fn find_by_dn(&self, dn: &str) -> MembershipResult<Option<Vec<DirectoryEntry>>> {
        let components = split_dn(dn);
        let Some(first) = components.first() else {
            return Ok(None);
        };

        let attribute = rdn_attribute(first)
            .unwrap_or(self.config.group_name_attribute.as_str())
            .to_ascii_lowercase();
        let mut request = SearchRequest::filtered(dn_filter(&attribute, &rdn_value(first)));
        let base = components[1..].join(",");
        if !base.is_empty() {
            request = request.with_base(base);
        }

        self.search(&request).await
    }

    /// Extracts the login (account name) from an entry.
    #[must_use]
    pub fn get_login_from_entry(&self, entry: &DirectoryEntry) -> Option<String> {
        entry
            .get_attr(&self.config.login_attribute)
            .map(str::to_string)
    }
}

/// Picks the entry naming `dn` from a by-DN result.
///
/// The subtree search behind [`AdMemberService::find_by_dn`] also returns
/// same-named entries further down the base, so only an exact DN match
/// counts.
pub(crate) fn entry_for_dn(entries: Vec<DirectoryEntry>, dn: &str) -> Option<DirectoryEntry> {
    let key = normalize_dn(dn);
    entries.into_iter().find(|e| normalize_dn(e.dn()) == key)
}
