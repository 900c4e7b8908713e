//! Active Directory membership facade.

use mbr_core::DirectorySearch;

use crate::config::AdConfig;
use crate::error::MembershipResult;
use crate::member_service::AdMemberService;
use crate::provider::MembershipProvider;

/// Lenient membership answers on top of [`AdMemberService`].
#[derive(Debug, Clone)]
pub struct ActiveDirectory<D> {
    member_service: AdMemberService<D>,
}

impl<D: DirectorySearch> ActiveDirectory<D> {
    /// Creates a facade over a directory.
    ///
    /// ## Errors
    ///
    /// Returns [`MembershipError::Configuration`](crate::MembershipError::Configuration) if the configuration is
    /// invalid.
    pub fn new(directory: D, config: AdConfig) -> MembershipResult<Self> {
        Ok(Self::with_member_service(AdMemberService::new(directory, config)?))
    }

    /// Wraps an existing member service.
    #[must_use]
    pub const fn with_member_service(member_service: AdMemberService<D>) -> Self {
        Self { member_service }
    }

    /// Returns the strict member service.
    #[must_use]
    pub const fn member_service(&self) -> &AdMemberService<D> {
        &self.member_service
    }
}

/// Maps not-found to `fallback`, keeping other errors.
fn or_not_found<T>(result: MembershipResult<T>, fallback: T) -> MembershipResult<T> {
    match result {
        Err(e) if e.is_not_found() => Ok(fallback),
        other => other,
    }
}

impl<D: DirectorySearch> MembershipProvider for ActiveDirectory<D> {
    async fn groups_for_uid(&self, uid: &str) -> MembershipResult<Vec<String>> {
        or_not_found(self.member_service.find_user_groups(uid).await, Vec::new())
    }

    async fn users_for_gid(&self, gid: &str) -> MembershipResult<Vec<String>> {
        or_not_found(self.member_service.users_for_gid(gid).await, Vec::new())
    }

    async fn user_exists(&self, uid: &str) -> MembershipResult<bool> {
        or_not_found(self.member_service.find_user(uid).await.map(|_| true), false)
    }

    async fn group_exists(&self, gid: &str) -> MembershipResult<bool> {
        or_not_found(self.member_service.find_group(gid).await.map(|_| true), false)
    }
}
