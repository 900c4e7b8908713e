//! Group to users scenarios.

use mbr_ad::MembershipError;
use mbr_core::{DirectoryEntry, InMemoryDirectory};
use mbr_integration_tests::{group_dn, init_tracing, member_service, person, BASE_DN, GROUP_BASE};

fn group_with_members(name: &str, members: &[String]) -> DirectoryEntry {
    DirectoryEntry::new(group_dn(name))
        .with_attr("cn", [name])
        .with_attr("objectClass", ["top", "group"])
        .with_attr("member", members.iter().cloned())
}

#[tokio::test]
async fn nested_members_and_primary_users() -> anyhow::Result<()> {
    init_tracing();
    let alice = person("Alice", "alice", 1201, &[]);
    let bob = person("Bob", "bob", 1202, &[]);
    let carol = person("Carol", "carol", 1203, &[]).with_attr("primaryGroupID", ["1300"]);

    let inner = group_with_members("inner", &[bob.dn().to_string(), alice.dn().to_string()])
        .with_attr("primaryGroupToken", ["1300"]);
    let outer = group_with_members("outer", &[alice.dn().to_string(), group_dn("inner")]);

    let directory = InMemoryDirectory::new()
        .with_entry(alice)
        .with_entry(bob)
        .with_entry(carol)
        .with_entry(inner)
        .with_entry(outer);
    let ms = member_service(directory);

    assert_eq!(ms.users_for_gid("outer").await?, vec!["alice", "bob", "carol"]);
    Ok(())
}

#[tokio::test]
async fn self_referencing_group_terminates() -> anyhow::Result<()> {
    init_tracing();
    let alice = person("Alice", "alice", 1201, &[]);
    let loopy = group_with_members("loopy", &[group_dn("loopy"), alice.dn().to_string()]);
    let ms = member_service(InMemoryDirectory::new().with_entry(alice).with_entry(loopy));

    assert_eq!(ms.users_for_gid("loopy").await?, vec!["alice"]);
    assert_eq!(ms.directory().requests_for_base(GROUP_BASE), 1);
    Ok(())
}

#[tokio::test]
async fn transitive_cycle_terminates() -> anyhow::Result<()> {
    init_tracing();
    let alice = person("Alice", "alice", 1201, &[]);
    let a = group_with_members("a", &[group_dn("b")]);
    let b = group_with_members("b", &[group_dn("c")]);
    let c = group_with_members("c", &[group_dn("a"), alice.dn().to_string()]);
    let ms = member_service(
        InMemoryDirectory::new()
            .with_entry(alice)
            .with_entry(a)
            .with_entry(b)
            .with_entry(c),
    );

    assert_eq!(ms.users_for_gid("a").await?, vec!["alice"]);
    Ok(())
}

#[tokio::test]
async fn foreign_members_are_skipped() -> anyhow::Result<()> {
    init_tracing();
    let computer = DirectoryEntry::new(format!("cn=WS01,cn=computers,{BASE_DN}"))
        .with_attr("cn", ["WS01"])
        .with_attr("objectClass", ["top", "device"]);
    let group = group_with_members(
        "mixed",
        &[
            computer.dn().to_string(),
            format!("cn=Deleted,cn=users,{BASE_DN}"),
            String::new(),
        ],
    );
    let ms = member_service(InMemoryDirectory::new().with_entry(computer).with_entry(group));

    assert!(ms.users_for_gid("mixed").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn unknown_group() {
    init_tracing();
    let ms = member_service(InMemoryDirectory::new());
    assert!(matches!(
        ms.users_for_gid("nobody").await,
        Err(MembershipError::GidNotFound(_))
    ));
}
