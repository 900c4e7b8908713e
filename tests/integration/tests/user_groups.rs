//! User to groups scenarios.

use mbr_ad::{MembershipError, PrimaryGroup};
use mbr_core::{DirectoryEntry, InMemoryDirectory, Scope};
use mbr_integration_tests::{
    basic_directory, double_nested, group, group_dn, init_tracing, member_service, nest_deep,
    person, sid, JOHN_DN,
};

#[tokio::test]
async fn basic_user() -> anyhow::Result<()> {
    init_tracing();
    let directory = basic_directory();
    directory.insert(group("bros1", &[]));
    let ms = member_service(directory);

    assert_eq!(ms.find_user_groups("john").await?, vec!["group", "bros1"]);
    Ok(())
}

#[tokio::test]
async fn nested_cycle_back_to_first_group() -> anyhow::Result<()> {
    init_tracing();
    let directory = basic_directory();
    directory.insert(group("bros1", &["group"]));
    let ms = member_service(directory);

    assert_eq!(ms.find_user_groups("john").await?, vec!["group", "bros1"]);
    Ok(())
}

#[tokio::test]
async fn deep_recursion_expands_each_group_once() -> anyhow::Result<()> {
    init_tracing();
    let ms = member_service(nest_deep(25));

    let groups = ms.find_user_groups("john").await?;
    assert_eq!(groups.len(), 26);
    assert_eq!(groups.first().map(String::as_str), Some("group"));
    assert_eq!(groups.last().map(String::as_str), Some("bros25"));

    for name in &groups {
        assert_eq!(ms.directory().requests_for_base(&group_dn(name)), 1, "{name}");
    }
    Ok(())
}

#[tokio::test]
async fn complex_recursion() -> anyhow::Result<()> {
    init_tracing();
    let ms = member_service(double_nested(5));

    let groups = ms.find_user_groups("john").await?;
    assert_eq!(groups.len(), 10);
    for i in 2..=5 {
        assert!(groups.contains(&format!("broskies{i}")));
    }
    Ok(())
}

#[tokio::test]
async fn two_group_cycle() -> anyhow::Result<()> {
    init_tracing();
    let directory = InMemoryDirectory::new()
        .with_entry(person("john", "john", 1104, &["a"]))
        .with_entry(group("a", &["b"]))
        .with_entry(group("b", &["a"]));
    let ms = member_service(directory);

    let mut groups = ms.find_user_groups("john").await?;
    groups.sort();
    assert_eq!(groups, vec!["a", "b"]);
    Ok(())
}

#[tokio::test]
async fn comma_in_group_name() -> anyhow::Result<()> {
    init_tracing();
    let dn = r"cn=Bar\, Foo,ou=group,dc=internet,dc=com";
    let directory = InMemoryDirectory::new()
        .with_entry(
            DirectoryEntry::new(JOHN_DN)
                .with_attr("sAMAccountName", ["john"])
                .with_attr("memberOf", [dn]),
        )
        .with_entry(DirectoryEntry::new(dn).with_attr("cn", ["Bar, Foo"]));
    let ms = member_service(directory);

    assert_eq!(ms.find_user_groups("john").await?, vec!["Bar, Foo"]);

    let found = ms.find_by_dn(dn).await?.unwrap_or_default();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].get_attr("cn"), Some("Bar, Foo"));
    Ok(())
}

#[tokio::test]
async fn absent_and_empty_user_lookups() {
    init_tracing();

    // Absent: nothing exists under the configured user base.
    let config = mbr_ad::AdConfig {
        user_base: Some("ou=nowhere,dc=internet,dc=com".to_string()),
        ..mbr_integration_tests::config()
    };
    let absent = mbr_ad::AdMemberService::new(basic_directory(), config).unwrap();
    assert!(matches!(
        absent.find_user_groups("john").await,
        Err(MembershipError::UidNotFound(_))
    ));

    // Empty: the search succeeds but matches nobody.
    let empty = member_service(basic_directory());
    assert!(matches!(
        empty.find_user_groups("jane").await,
        Err(MembershipError::UidNotFound(uid)) if uid == "jane"
    ));
}

#[tokio::test]
async fn primary_group_is_included() -> anyhow::Result<()> {
    init_tracing();
    let user = person("t_user", "tuser", 4321, &[]).with_attr("primaryGroupID", ["12345"]);
    let primary = group("p_group", &["everyone"])
        .with_binary_attr("objectSid", sid(12345).to_bytes());
    let directory = InMemoryDirectory::new()
        .with_entry(user)
        .with_entry(primary)
        .with_entry(group("everyone", &[]));
    let ms = member_service(directory);

    assert!(matches!(ms.primary_group("tuser").await?, PrimaryGroup::Found(_)));
    assert_eq!(ms.find_user_groups("tuser").await?, vec!["p_group", "everyone"]);

    let expansions = ms
        .directory()
        .requests()
        .into_iter()
        .filter(|r| r.scope == Scope::Base)
        .count();
    // p_group and everyone, each expanded once.
    assert_eq!(expansions, 2);
    Ok(())
}

#[tokio::test]
async fn malformed_sid_skips_primary_group() -> anyhow::Result<()> {
    init_tracing();
    let user = DirectoryEntry::new(JOHN_DN)
        .with_attr("sAMAccountName", ["john"])
        .with_attr("memberOf", [group_dn("group")])
        .with_attr("primaryGroupID", ["513"])
        .with_binary_attr("objectSid", vec![1u8, 4, 0]);
    let directory = InMemoryDirectory::new()
        .with_entry(user)
        .with_entry(group("group", &[]))
        .with_entry(group("domain users", &[]).with_binary_attr("objectSid", sid(513).to_bytes()));
    let ms = member_service(directory);

    assert_eq!(ms.find_user_groups("john").await?, vec!["group"]);
    Ok(())
}
