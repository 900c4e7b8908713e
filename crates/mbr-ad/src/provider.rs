//! Membership provider trait.
//!
//! The caller-facing surface used for authorization decisions. Lookups
//! here are lenient: an unknown user belongs to no groups and an unknown
//! group has no users. Directory failures still propagate.

use crate::error::MembershipResult;

// ============================================================================
// Membership Provider
// ============================================================================

/// Trait for answering group membership questions about principals.
///
/// ## Implementation Notes
///
/// - Providers should be thread-safe (Send + Sync)
/// - Each call resolves independently; no traversal state is shared
#[allow(async_fn_in_trait)]
pub trait MembershipProvider: Send + Sync {
    /// Returns the names of every group the user belongs to.
    ///
    /// Unknown users yield an empty list.
    async fn groups_for_uid(&self, uid: &str) -> MembershipResult<Vec<String>>;

    /// Returns the logins of every user in the group.
    ///
    /// Unknown groups yield an empty list.
    async fn users_for_gid(&self, gid: &str) -> MembershipResult<Vec<String>>;

    /// Checks whether a user exists.
    async fn user_exists(&self, uid: &str) -> MembershipResult<bool>;

    /// Checks whether a group exists.
    async fn group_exists(&self, gid: &str) -> MembershipResult<bool>;

    // === Decisions ===

    /// Checks a user's membership against a list of groups.
    ///
    /// With `all` set every group must be present (trivially true for an
    /// empty list); otherwise at least one must be.
    async fn is_in_groups<S: AsRef<str> + Sync>(
        &self,
        uid: &str,
        gids: &[S],
        all: bool,
    ) -> MembershipResult<bool> {
        let groups = self.groups_for_uid(uid).await?;
        let member = |gid: &S| groups.iter().any(|g| g == gid.as_ref());

        Ok(if all {
            gids.iter().all(member)
        } else {
            gids.iter().any(member)
        })
    }
}
