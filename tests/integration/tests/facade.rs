//! Caller facade scenarios.

use mbr_ad::MembershipProvider;
use mbr_integration_tests::{active_directory, group, init_tracing, nest_deep};

#[tokio::test]
async fn membership_decisions() -> anyhow::Result<()> {
    init_tracing();
    let ad = active_directory(nest_deep(3));

    assert_eq!(ad.groups_for_uid("john").await?, vec!["group", "bros1", "bros2", "bros3"]);
    assert!(ad.is_in_groups("john", &["bros3"], true).await?);
    assert!(ad.is_in_groups("john", &["group", "bros2"], true).await?);
    assert!(!ad.is_in_groups("john", &["group", "admins"], true).await?);
    assert!(ad.is_in_groups("john", &["group", "admins"], false).await?);
    assert!(ad.is_in_groups("john", &[] as &[&str], true).await?);
    assert!(!ad.is_in_groups("john", &[] as &[&str], false).await?);
    Ok(())
}

#[tokio::test]
async fn unknown_principals_are_not_errors() -> anyhow::Result<()> {
    init_tracing();
    let directory = nest_deep(1);
    directory.insert(group("empty", &[]));
    let ad = active_directory(directory);

    assert!(ad.groups_for_uid("jane").await?.is_empty());
    assert!(!ad.is_in_groups("jane", &["group"], false).await?);
    assert!(!ad.user_exists("jane").await?);
    assert!(ad.user_exists("john").await?);
    assert!(ad.group_exists("bros1").await?);
    assert!(!ad.group_exists("admins").await?);
    assert!(ad.users_for_gid("admins").await?.is_empty());
    assert!(ad.users_for_gid("empty").await?.is_empty());
    Ok(())
}
