//! Primary group resolution.
//!
//! A user's primary group is not listed in `memberOf`. It is named by
//! replacing the RID of the user's `objectSid` with the numeric
//! `primaryGroupID`, then searching the group base for that SID.

use mbr_core::filter::sid_filter;
use mbr_core::{DirectoryEntry, DirectorySearch, SearchRequest, Sid};

use crate::error::MembershipResult;
use crate::member_service::AdMemberService;

/// Outcome of a primary group lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimaryGroup {
    /// The group entry named by the user's primary group SID.
    Found(DirectoryEntry),
    /// The SID was well-formed but no group carries it.
    NotFound,
    /// The user's SID or primary group ID is missing or unusable.
    Malformed(String),
}

impl PrimaryGroup {
    /// Returns the group entry if one was found.
    #[must_use]
    pub const fn entry(&self) -> Option<&DirectoryEntry> {
        match self {
            Self::Found(entry) => Some(entry),
            Self::NotFound | Self::Malformed(_) => None,
        }
    }
}

impl<D: DirectorySearch> AdMemberService<D> {
    /// Resolves the primary group of a user given by account name.
    ///
    /// ## Errors
    ///
    /// Returns [`MembershipError::UidNotFound`](crate::MembershipError::UidNotFound)
    /// if the user does not exist. A malformed SID is reported as
    /// [`PrimaryGroup::Malformed`], not as an error.
    pub async fn primary_group(&self, uid: &str) -> MembershipResult<PrimaryGroup> {
        let user = self.find_user(uid).await?;
        self.primary_group_of(&user).await
    }

    /// Resolves the primary group of an already fetched user entry.
    ///
    /// ## Errors
    ///
    /// Only directory failures are returned as errors.
    pub async fn primary_group_of(&self, user: &DirectoryEntry) -> MembershipResult<PrimaryGroup> {
        let sid = match self.primary_group_sid(user) {
            Ok(sid) => sid,
            Err(reason) => {
                tracing::debug!(dn = %user.dn(), reason = %reason, "no primary group");
                return Ok(PrimaryGroup::Malformed(reason));
            }
        };

        let request = SearchRequest::filtered(sid_filter(&self.config().object_sid_attribute, &sid))
            .with_base(self.config().group_base.clone())
            .with_attributes([self.config().member_of_attribute.as_str()]);

        let group = self
            .search(&request)
            .await?
            .and_then(|entries| entries.into_iter().next());

        Ok(match group {
            Some(entry) => {
                tracing::debug!(sid = %sid, group = %entry.dn(), "resolved primary group");
                PrimaryGroup::Found(entry)
            }
            None => {
                tracing::debug!(sid = %sid, "primary group SID matched no group");
                PrimaryGroup::NotFound
            }
        })
    }

    /// Computes the primary group SID from the user's own SID and
    /// `primaryGroupID`.
    fn primary_group_sid(&self, user: &DirectoryEntry) -> Result<Sid, String> {
        let config = self.config();

        let token = user
            .get_attr(&config.primary_group_id_attribute)
            .ok_or_else(|| format!("missing {}", config.primary_group_id_attribute))?;
        let rid: u32 = token
            .trim()
            .parse()
            .map_err(|_| format!("invalid {}: {token}", config.primary_group_id_attribute))?;

        let bytes = user
            .get_binary_attr(&config.object_sid_attribute)
            .ok_or_else(|| format!("missing {}", config.object_sid_attribute))?;
        let sid = Sid::from_bytes(bytes).map_err(|e| {
            tracing::warn!(dn = %user.dn(), error = %e, "malformed user SID");
            e.to_string()
        })?;

        sid.with_rid(rid).map_err(|e| e.to_string())
    }
}
