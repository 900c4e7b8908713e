//! # mbr-ad
//!
//! Active Directory group membership resolution.
//!
//! Given a user, [`AdMemberService::find_user_groups`] returns every group
//! the user effectively belongs to: direct `memberOf` links, their nested
//! ancestors, and the primary group encoded through `primaryGroupID`.
//! Given a group, [`AdMemberService::users_for_gid`] returns every login
//! reachable through `member` links and nested groups.
//!
//! Both traversals keep a per-call visited set, so cyclic nesting
//! terminates and each node is expanded at most once.
//!
//! [`ActiveDirectory`] wraps the member service behind the
//! [`MembershipProvider`] trait used for authorization decisions.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod facade;
pub mod group_users;
pub mod member_service;
pub mod primary_group;
pub mod provider;
pub mod user_groups;

pub use config::{AdConfig, AdConfigBuilder};
pub use error::{MembershipError, MembershipResult};
pub use facade::ActiveDirectory;
pub use member_service::AdMemberService;
pub use primary_group::PrimaryGroup;
pub use provider::MembershipProvider;
