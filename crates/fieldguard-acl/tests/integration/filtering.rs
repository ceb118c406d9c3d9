//! End-to-end document filtering through the orchestrator.

use fieldguard_core::{AccessType, Permission};
use serde_json::json;

use crate::common::{perms, read, request, TestHarness};

#[tokio::test]
async fn test_full_read_returns_document_unchanged() {
    let harness = TestHarness::new()
        .explicit("alice", "", read(), None)
        .explicit("alice", "/name", read(), None)
        .explicit("alice", "/address/city", read(), None);

    let result = harness
        .orchestrator()
        .filter_resource(&request("alice", &[]))
        .await
        .unwrap()
        .expect("alice has access");

    assert_eq!(
        result.resource.data,
        Some(json!({"name": "John", "address": {"city": "London"}}))
    );
    assert_eq!(result.access.access_type, AccessType::Explicit);
    assert_eq!(result.access.permissions.len(), 3);
}

#[tokio::test]
async fn test_attribute_without_read_is_removed() {
    let harness = TestHarness::new()
        .explicit("alice", "", read(), None)
        .explicit("alice", "/name", read(), None)
        .explicit("alice", "/address/city", perms(&[Permission::Create]), None);

    let result = harness
        .orchestrator()
        .filter_resource(&request("alice", &[]))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        result.resource.data,
        Some(json!({"name": "John", "address": {}}))
    );
    // The report still lists the non-READ entry.
    assert_eq!(result.access.permissions.len(), 3);
}

#[tokio::test]
async fn test_no_readable_attribute_gives_absent_document() {
    let harness = TestHarness::new().explicit(
        "alice",
        "/name",
        perms(&[Permission::Update, Permission::Delete]),
        None,
    );

    let result = harness
        .orchestrator()
        .filter_resource(&request("alice", &[]))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.resource.data, None);
    assert_eq!(result.access.permissions.len(), 1);
}

#[tokio::test]
async fn test_unknown_caller_is_denied() {
    let harness = TestHarness::new().explicit("alice", "", read(), None);

    let result = harness
        .orchestrator()
        .filter_resource(&request("mallory", &[]))
        .await
        .unwrap();

    assert!(result.is_none());
}

#[tokio::test]
async fn test_grants_for_other_resources_ignored() {
    let harness = TestHarness::new().explicit("alice", "", read(), None);
    let mut req = request("alice", &[]);
    req.resource.id = "case-2".to_string();

    let result = harness.orchestrator().filter_resource(&req).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_leaf_grants_without_root() {
    let harness = TestHarness::new().explicit("alice", "/address/city", read(), None);

    let result = harness
        .orchestrator()
        .filter_resource(&request("alice", &[]))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        result.resource.data,
        Some(json!({"address": {"city": "London"}}))
    );
}
