//! Classification ceilings applied end to end.

use fieldguard_acl::{AclConfig, ClassificationConfig, Error, UnclassifiedPolicy};
use fieldguard_core::{AccessType, Permission, SecurityClassification};
use serde_json::json;

use crate::common::{classifications, perms, read, request, TestHarness};

fn harness() -> TestHarness {
    TestHarness::new()
        .explicit("alice", "", read(), Some("caseworker"))
        .explicit("alice", "/address", perms(&[Permission::Read, Permission::Update]), None)
        .role("judge", SecurityClassification::Restricted, AccessType::Explicit)
        .role("clerk", SecurityClassification::Public, AccessType::RoleBased)
}

#[tokio::test]
async fn test_higher_ceiling_sees_private_root() {
    let req = request("alice", &["judge"]).with_classifications(classifications(&[(
        "",
        SecurityClassification::Private,
    )]));

    let result = harness()
        .orchestrator()
        .filter_resource(&req)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        result.user_security_classification,
        Some(SecurityClassification::Restricted)
    );
    assert_eq!(result.access.permissions.len(), 2);
    assert_eq!(
        result.resource.data,
        Some(json!({"name": "John", "address": {"city": "London"}}))
    );
}

#[tokio::test]
async fn test_lower_ceiling_hides_everything() {
    let req = request("alice", &["clerk"]).with_classifications(classifications(&[(
        "",
        SecurityClassification::Private,
    )]));

    let result = harness()
        .orchestrator()
        .filter_resource(&req)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        result.user_security_classification,
        Some(SecurityClassification::Public)
    );
    assert!(result.access.permissions.is_empty());
    assert_eq!(result.resource.data, None);
}

#[tokio::test]
async fn test_classified_subtree_removed_from_report() {
    let req = request("alice", &["clerk"]).with_classifications(classifications(&[
        ("", SecurityClassification::Public),
        ("/address", SecurityClassification::Restricted),
    ]));

    let result = harness()
        .orchestrator()
        .filter_resource(&req)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.access.permissions.len(), 1);
    assert_eq!(result.resource.data, Some(json!({"name": "John"})));
}

#[tokio::test]
async fn test_ceiling_hides_granted_leaf_under_readable_root() {
    let harness = TestHarness::new()
        .explicit("alice", "", read(), None)
        .explicit("alice", "/address/city", perms(&Permission::ALL), None)
        .role("caseworker", SecurityClassification::Private, AccessType::Explicit);
    let req = request("alice", &["caseworker"]).with_classifications(classifications(&[
        ("", SecurityClassification::Public),
        ("/address/city", SecurityClassification::Restricted),
    ]));

    let result = harness.orchestrator().filter_resource(&req).await.unwrap().unwrap();

    assert_eq!(result.access.permissions.len(), 1);
    assert_eq!(
        result.resource.data,
        Some(json!({"name": "John", "address": {}}))
    );
}

#[tokio::test]
async fn test_kept_entries_retain_non_read_bits() {
    let req = request("alice", &["judge"]).with_classifications(classifications(&[(
        "",
        SecurityClassification::Public,
    )]));

    let result = harness()
        .orchestrator()
        .filter_resource(&req)
        .await
        .unwrap()
        .unwrap();

    let address = result.access.permissions[&"/address".parse().unwrap()];
    assert!(address.contains(Permission::Update));
}

#[tokio::test]
async fn test_unclassified_caller_is_client_error() {
    let req = request("alice", &["visitor"]).with_classifications(classifications(&[(
        "",
        SecurityClassification::Public,
    )]));

    let err = harness().orchestrator().filter_resource(&req).await.unwrap_err();
    assert!(err.is_client_error());
}

#[tokio::test]
async fn test_unclassified_root_hidden_by_default() {
    let req = request("alice", &["judge"]).with_classifications(classifications(&[(
        "/address",
        SecurityClassification::Public,
    )]));

    let result = harness()
        .orchestrator()
        .filter_resource(&req)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.access.permissions.len(), 1);
    assert_eq!(
        result.resource.data,
        Some(json!({"address": {"city": "London"}}))
    );
}

#[tokio::test]
async fn test_unclassified_root_rejected_when_configured() {
    let config = AclConfig {
        classification: ClassificationConfig {
            unclassified: UnclassifiedPolicy::Reject,
        },
        ..Default::default()
    };
    let req = request("alice", &["judge"]).with_classifications(classifications(&[(
        "/address",
        SecurityClassification::Public,
    )]));

    let err = harness()
        .config(config)
        .orchestrator()
        .filter_resource(&req)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Core(fieldguard_core::Error::UnresolvedRootClassification { .. })
    ));
}
