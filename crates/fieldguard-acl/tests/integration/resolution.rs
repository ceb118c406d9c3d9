//! Explicit and role-based permission resolution.

use std::collections::BTreeSet;

use fieldguard_core::{AccessType, AttributePath, Permission, SecurityClassification};
use serde_json::json;

use crate::common::{perms, read, request, TestHarness};

fn path(s: &str) -> AttributePath {
    s.parse().unwrap()
}

#[tokio::test]
async fn test_explicit_grants_union_across_relationships() {
    let harness = TestHarness::new()
        .explicit("alice", "/name", read(), Some("caseworker"))
        .explicit(
            "alice",
            "/address",
            perms(&[Permission::Read, Permission::Update]),
            Some("solicitor"),
        );

    let result = harness
        .orchestrator()
        .filter_resource(&request("alice", &[]))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.access.access_type, AccessType::Explicit);
    assert_eq!(
        result.relationships,
        BTreeSet::from(["caseworker".to_string(), "solicitor".to_string()])
    );
    assert_eq!(result.access.permissions[&path("/name")], read());
    assert_eq!(result.access.permissions[&path("/address")].encode(), 6);
    assert_eq!(result.resource.data, Some(json!({"name": "John", "address": {"city": "London"}})));
}

#[tokio::test]
async fn test_role_grants_merge_overlapping_bits() {
    let harness = TestHarness::new()
        .role("clerk", SecurityClassification::Public, AccessType::RoleBased)
        .role("supervisor", SecurityClassification::Private, AccessType::RoleBased)
        .default_grant("clerk", "/name", perms(&[Permission::Read]))
        .default_grant("supervisor", "/name", perms(&[Permission::Update]))
        .default_grant("supervisor", "/address", perms(&[Permission::Read, Permission::Create]));

    let result = harness
        .orchestrator()
        .filter_resource(&request("bob", &["clerk", "supervisor"]))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.access.access_type, AccessType::RoleBased);
    assert!(result.relationships.is_empty());
    assert_eq!(
        result.access.permissions[&path("/name")],
        perms(&[Permission::Read, Permission::Update])
    );
    assert_eq!(
        result.access.permissions[&path("/address")],
        perms(&[Permission::Read, Permission::Create])
    );
}

#[tokio::test]
async fn test_explicit_grants_take_precedence_over_roles() {
    let harness = TestHarness::new()
        .explicit("bob", "/name", read(), Some("owner"))
        .role("clerk", SecurityClassification::Public, AccessType::RoleBased)
        .default_grant("clerk", "", read());

    let result = harness
        .orchestrator()
        .filter_resource(&request("bob", &["clerk"]))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.access.access_type, AccessType::Explicit);
    assert_eq!(result.resource.data, Some(json!({"name": "John"})));
}

#[tokio::test]
async fn test_explicit_only_role_gives_no_default_access() {
    let harness = TestHarness::new()
        .role("judge", SecurityClassification::Restricted, AccessType::Explicit)
        .default_grant("judge", "", read());

    let result = harness
        .orchestrator()
        .filter_resource(&request("carol", &["judge"]))
        .await
        .unwrap();

    assert!(result.is_none());
}

#[tokio::test]
async fn test_role_without_default_grants_sees_nothing() {
    let harness =
        TestHarness::new().role("clerk", SecurityClassification::Public, AccessType::RoleBased);

    let result = harness
        .orchestrator()
        .filter_resource(&request("bob", &["clerk"]))
        .await
        .unwrap()
        .unwrap();

    assert!(result.access.permissions.is_empty());
    assert_eq!(result.resource.data, None);
}
