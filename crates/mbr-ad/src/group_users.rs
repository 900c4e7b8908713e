//! Group to users resolution.
//!
//! Expands downward membership links (`member`) from a group. Every member
//! DN is fetched and classified by object class: persons contribute their
//! login, nested groups (any configured group class) are looked up afresh
//! by name and expanded in turn.
//! Users whose primary group is an expanded group are added through a
//! `primaryGroupID` search, since they carry no `member` link.

use std::collections::{HashSet, VecDeque};

use mbr_core::dn::{extract_cn, normalize_dn};
use mbr_core::filter::primary_group_id_filter;
use mbr_core::{DirectoryEntry, DirectorySearch, SearchRequest};

use crate::error::MembershipResult;
use crate::member_service::{entry_for_dn, AdMemberService};

#[derive(Debug, Default)]
struct MemberWalk {
    visited: HashSet<String>,
    pending: VecDeque<DirectoryEntry>,
    seen: HashSet<String>,
    logins: Vec<String>,
}

impl MemberWalk {
    fn visit(&mut self, dn: &str) -> bool {
        self.visited.insert(normalize_dn(dn))
    }

    fn add_login(&mut self, login: String) {
        if self.seen.insert(login.clone()) {
            self.logins.push(login);
        }
    }
}

/// How a member entry takes part in the expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MemberKind {
    Person,
    Group,
    Other,
}

impl<D: DirectorySearch> AdMemberService<D> {
    /// Returns the logins of every user in a group, including members of
    /// nested groups and users that have it as primary group.
    ///
    /// ## Errors
    ///
    /// Returns [`MembershipError::GidNotFound`](crate::MembershipError::GidNotFound)
    /// if the group itself cannot be located. Members that cannot be
    /// fetched or classified are skipped.
    #[tracing::instrument(skip(self))]
    pub async fn users_for_gid(&self, gid: &str) -> MembershipResult<Vec<String>> {
        let root = self.find_group(gid).await?;

        let mut walk = MemberWalk::default();
        walk.visit(root.dn());
        walk.pending.push_back(root);

        while let Some(group) = walk.pending.pop_front() {
            for dn in group.values(&self.config().member_attribute) {
                if dn.trim().is_empty() || !walk.visit(dn) {
                    continue;
                }
                self.expand_member(dn, &mut walk).await?;
            }

            self.add_primary_members(&group, &mut walk).await?;
        }

        tracing::debug!(gid = %gid, users = walk.logins.len(), "resolved group members");
        Ok(walk.logins)
    }

    async fn expand_member(&self, dn: &str, walk: &mut MemberWalk) -> MembershipResult<()> {
        let Some(entry) = self
            .find_by_dn(dn)
            .await?
            .and_then(|entries| entry_for_dn(entries, dn))
        else {
            tracing::debug!(member = %dn, "member entry missing, skipping");
            return Ok(());
        };

        match self.classify(&entry) {
            MemberKind::Person => match self.get_login_from_entry(&entry) {
                Some(login) => walk.add_login(login),
                None => tracing::debug!(member = %dn, "person without login"),
            },
            MemberKind::Group => {
                let name = entry
                    .get_attr(&self.config().group_name_attribute)
                    .map_or_else(|| extract_cn(dn), str::to_string);

                let nested = match self.find_nested_group(&name).await {
                    Ok(nested) => nested,
                    Err(e) if e.is_not_found() => {
                        tracing::debug!(member = %dn, group = %name, "nested group lookup failed, skipping");
                        return Ok(());
                    }
                    Err(e) => return Err(e),
                };

                // The fresh record may sit at another DN that was already expanded.
                if normalize_dn(nested.dn()) == normalize_dn(dn) || walk.visit(nested.dn()) {
                    walk.pending.push_back(nested);
                }
            }
            MemberKind::Other => {
                tracing::trace!(member = %dn, "unclassified member skipped");
            }
        }

        Ok(())
    }

    /// Adds users whose `primaryGroupID` equals the group's token.
    async fn add_primary_members(
        &self,
        group: &DirectoryEntry,
        walk: &mut MemberWalk,
    ) -> MembershipResult<()> {
        let config = self.config();
        let Some(token) = group.get_attr(&config.primary_group_token_attribute) else {
            return Ok(());
        };

        let request =
            SearchRequest::filtered(primary_group_id_filter(&config.primary_group_id_attribute, token))
                .with_base(config.base_dn.clone())
                .with_attributes([config.login_attribute.as_str()]);

        for user in self.search(&request).await?.unwrap_or_default() {
            if let Some(login) = self.get_login_from_entry(&user) {
                walk.add_login(login);
            }
        }
        Ok(())
    }

    fn classify(&self, entry: &DirectoryEntry) -> MemberKind {
        if entry.has_any_object_class(self.config().person_classes.as_slice()) {
            MemberKind::Person
        } else if entry.has_any_object_class(self.config().group_classes.as_slice()) {
            MemberKind::Group
        } else {
            MemberKind::Other
        }
    }
}
