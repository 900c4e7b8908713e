//! Shared fixtures for the membership scenarios.
//!
//! Directories are built in memory: a user `john` whose `memberOf` names
//! `group`, with further nesting layered on top by each scenario.

use std::sync::Arc;

use mbr_ad::{ActiveDirectory, AdConfig, AdMemberService};
use mbr_core::{DirectoryEntry, InMemoryDirectory, Sid};

/// Naming context of the fixture domain.
pub const BASE_DN: &str = "dc=internet,dc=com";

/// Group search base.
pub const GROUP_BASE: &str = "ou=group,dc=internet,dc=com";

/// DN of the fixture user.
pub const JOHN_DN: &str = "cn=john,cn=users,dc=internet,dc=com";

/// Domain SID shared by every fixture principal.
pub const DOMAIN_SID: &str = "S-1-5-21-34567-23456";

/// Initializes test logging once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("mbr_ad=debug,mbr_core=info")
        .with_test_writer()
        .try_init();
}

/// Resolver configuration for the fixture domain.
#[must_use]
pub fn config() -> AdConfig {
    AdConfig::builder()
        .base_dn(BASE_DN)
        .group_base(GROUP_BASE)
        .build()
        .expect("fixture configuration is valid")
}

/// DN of a fixture group.
#[must_use]
pub fn group_dn(name: &str) -> String {
    format!("cn={name},{GROUP_BASE}")
}

/// A group entry nested into `parents`.
#[must_use]
pub fn group(name: &str, parents: &[&str]) -> DirectoryEntry {
    DirectoryEntry::new(group_dn(name))
        .with_attr("cn", [name])
        .with_attr("objectClass", ["top", "group"])
        .with_attr("memberOf", parents.iter().map(|p| group_dn(p)))
}

/// A person entry with a login and SID, member of `groups`.
#[must_use]
pub fn person(cn: &str, login: &str, rid: u32, groups: &[&str]) -> DirectoryEntry {
    DirectoryEntry::new(format!("cn={cn},cn=users,{BASE_DN}"))
        .with_attr("cn", [cn])
        .with_attr("sAMAccountName", [login])
        .with_attr("objectClass", ["top", "person", "organizationalPerson", "user"])
        .with_attr("memberOf", groups.iter().map(|g| group_dn(g)))
        .with_binary_attr("objectSid", sid(rid).to_bytes())
}

/// A principal SID in the fixture domain.
#[must_use]
pub fn sid(rid: u32) -> Sid {
    format!("{DOMAIN_SID}-{rid}")
        .parse()
        .expect("fixture SID is valid")
}

/// `john` in `group`, `group` in `bros1`.
#[must_use]
pub fn basic_directory() -> InMemoryDirectory {
    InMemoryDirectory::new()
        .with_entry(person("john", "john", 1104, &["group"]))
        .with_entry(group("group", &["bros1"]))
}

/// `bros1` nested through `bros{n}`, one level at a time.
#[must_use]
pub fn nest_deep(n: usize) -> InMemoryDirectory {
    let directory = basic_directory();
    for i in 1..n {
        let parent = format!("bros{}", i + 1);
        directory.insert(group(&format!("bros{i}"), &[parent.as_str()]));
    }
    directory.insert(group(&format!("bros{n}"), &[]));
    directory
}

/// Like [`nest_deep`], but each `bros{i}` also joins `broskies{i + 1}`.
#[must_use]
pub fn double_nested(n: usize) -> InMemoryDirectory {
    let directory = basic_directory();
    for i in 1..n {
        let bros = format!("bros{}", i + 1);
        let broskies = format!("broskies{}", i + 1);
        directory.insert(group(&format!("bros{i}"), &[bros.as_str(), broskies.as_str()]));
        directory.insert(group(&broskies, &[]));
    }
    directory.insert(group(&format!("bros{n}"), &[]));
    directory
}

/// Strict member service over a fixture directory.
#[must_use]
pub fn member_service(directory: InMemoryDirectory) -> AdMemberService<Arc<InMemoryDirectory>> {
    AdMemberService::new(Arc::new(directory), config()).expect("fixture configuration is valid")
}

/// Lenient facade over a fixture directory.
#[must_use]
pub fn active_directory(directory: InMemoryDirectory) -> ActiveDirectory<Arc<InMemoryDirectory>> {
    ActiveDirectory::new(Arc::new(directory), config()).expect("fixture configuration is valid")
}
