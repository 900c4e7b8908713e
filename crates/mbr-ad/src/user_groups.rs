//! User to groups resolution.
//!
//! Walks upward membership links (`memberOf`) breadth-first from a user's
//! direct groups. Groups are identified by normalized DN; a DN is marked
//! visited when first discovered, before its parents are queried, so each
//! group is expanded once however many paths lead to it and cycles end.

use std::collections::{HashSet, VecDeque};

use mbr_core::dn::{extract_cn, normalize_dn};
use mbr_core::{DirectorySearch, SearchRequest};

use crate::error::MembershipResult;
use crate::member_service::AdMemberService;
use crate::primary_group::PrimaryGroup;

/// Traversal state for one `find_user_groups` call.
#[derive(Debug, Default)]
struct GroupWalk {
    visited: HashSet<String>,
    names: HashSet<String>,
    groups: Vec<String>,
    frontier: VecDeque<String>,
}

impl GroupWalk {
    /// Records a group DN. Returns false if it was already discovered.
    fn discover(&mut self, dn: &str) -> bool {
        if dn.trim().is_empty() || !self.visited.insert(normalize_dn(dn)) {
            return false;
        }
        let name = extract_cn(dn);
        if self.names.insert(name.clone()) {
            self.groups.push(name);
        }
        self.frontier.push_back(dn.to_string());
        true
    }
}

impl<D: DirectorySearch> AdMemberService<D> {
    /// Returns every group a user belongs to, directly, through nesting,
    /// or as primary group.
    ///
    /// Names are the leading RDN value of each group DN, deduplicated, in
    /// order of first discovery.
    ///
    /// ## Errors
    ///
    /// Returns [`MembershipError::UidNotFound`](crate::MembershipError::UidNotFound)
    /// if the user cannot be located. Groups whose lookup yields nothing
    /// simply end their branch.
    #[tracing::instrument(skip(self))]
    pub async fn find_user_groups(&self, uid: &str) -> MembershipResult<Vec<String>> {
        let user = self.find_user(uid).await?;

        let mut walk = GroupWalk::default();
        for dn in user.values(&self.config().member_of_attribute) {
            walk.discover(dn);
        }
        self.walk_ancestry(&mut walk).await?;

        if let PrimaryGroup::Found(group) = self.primary_group_of(&user).await? {
            if walk.discover(group.dn()) {
                self.walk_ancestry(&mut walk).await?;
            } else {
                tracing::trace!(group = %group.dn(), "primary group already linked");
            }
        }

        tracing::debug!(uid = %uid, groups = walk.groups.len(), "resolved user groups");
        Ok(walk.groups)
    }

    /// Expands the frontier until no undiscovered parent remains.
    async fn walk_ancestry(&self, walk: &mut GroupWalk) -> MembershipResult<()> {
        let attribute = self.config().member_of_attribute.as_str();

        while let Some(dn) = walk.frontier.pop_front() {
            let request = SearchRequest::base_object(dn.as_str()).with_attributes([attribute]);
            let Some(entries) = self.search(&request).await? else {
                tracing::debug!(group = %dn, "group entry missing, ending branch");
                continue;
            };

            for parent in entries.iter().flat_map(|e| e.values(attribute)) {
                walk.discover(parent);
            }
        }

        Ok(())
    }
}
