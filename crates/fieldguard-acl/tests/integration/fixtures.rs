//! Grant fixtures loaded from JSON, plus audit configuration.

use std::sync::Arc;

use fieldguard_acl::{AclConfig, AuditConfig, AuditField, Error, FilteringOrchestrator, MemoryLookup};
use fieldguard_core::{AccessType, AccessorType};
use serde_json::json;

use crate::common::request;

const FIXTURE: &str = r#"{
    "explicitAccess": [
        {
            "resourceId": "case-1",
            "accessorId": "caseworkers",
            "accessorType": "ROLE",
            "resourceDefinition": {
                "serviceName": "cases",
                "resourceType": "case",
                "resourceName": "claim"
            },
            "attribute": "/name",
            "permissions": 3,
            "relationship": "assigned"
        },
        {
            "resourceId": "case-1",
            "accessorId": "*",
            "accessorType": "DEFAULT",
            "resourceDefinition": {
                "serviceName": "cases",
                "resourceType": "case",
                "resourceName": "claim"
            },
            "attributePath": "/address/city",
            "permissions": ["READ"]
        }
    ],
    "roleClassifications": [
        {"roleName": "caseworkers", "securityClassification": "PRIVATE", "accessType": "EXPLICIT"}
    ]
}"#;

#[tokio::test]
async fn test_json_fixture_drives_orchestrator() {
    let lookup = MemoryLookup::from_json(FIXTURE).unwrap();
    assert_eq!(
        lookup.fixture().explicit_access[0].accessor_type,
        AccessorType::Role
    );

    let orchestrator = FilteringOrchestrator::new(Arc::new(lookup), AclConfig::default());
    let result = orchestrator
        .filter_resource(&request("dave", &["caseworkers"]))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.access.access_type, AccessType::Explicit);
    assert!(result.relationships.contains("assigned"));
    assert_eq!(
        result.resource.data,
        Some(json!({"name": "John", "address": {"city": "London"}}))
    );
}

#[test]
fn test_malformed_fixture_is_lookup_error() {
    let err = MemoryLookup::from_json(r#"{"explicitAccess": [{"attribute": "no-slash"}]}"#)
        .unwrap_err();
    assert!(matches!(err, Error::Lookup { .. }));
}

#[tokio::test]
async fn test_audited_orchestrator_returns_same_result() {
    let config = AclConfig::from_toml_str(
        r#"
        [audit]
        enabled = true
        template = "{user_id} -> {resource_id} ({outcome})"
        fields = ["roles", "access_type", "classification"]
        "#,
    )
    .unwrap();
    assert_eq!(config.audit.fields[0], AuditField::Roles);

    let plain = FilteringOrchestrator::new(
        Arc::new(MemoryLookup::from_json(FIXTURE).unwrap()),
        AclConfig::default(),
    );
    let audited = FilteringOrchestrator::new(Arc::new(MemoryLookup::from_json(FIXTURE).unwrap()), config);

    let req = request("dave", &["caseworkers"]);
    assert_eq!(
        plain.filter_resource(&req).await.unwrap(),
        audited.filter_resource(&req).await.unwrap()
    );
    assert!(!AuditConfig::default().enabled);
}
