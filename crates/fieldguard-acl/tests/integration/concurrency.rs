//! One orchestrator shared across concurrent requests.

use std::sync::Arc;

use fieldguard_core::{AccessType, SecurityClassification};
use serde_json::json;

use crate::common::{read, request, TestHarness};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_are_independent() {
    let harness = TestHarness::new()
        .explicit("alice", "", read(), None)
        .explicit("bob", "/name", read(), None)
        .role("clerk", SecurityClassification::Public, AccessType::RoleBased)
        .default_grant("clerk", "/address", read());
    let orchestrator = Arc::new(harness.orchestrator());

    let mut handles = Vec::new();
    for i in 0..32 {
        let orchestrator = Arc::clone(&orchestrator);
        handles.push(tokio::spawn(async move {
            let (user, roles): (&str, &[&str]) = match i % 3 {
                0 => ("alice", &[]),
                1 => ("bob", &[]),
                _ => ("carol", &["clerk"]),
            };
            let result = orchestrator
                .filter_resource(&request(user, roles))
                .await
                .unwrap()
                .unwrap();
            (i % 3, result.resource.data)
        }));
    }

    for handle in handles {
        let (kind, data) = handle.await.unwrap();
        let expected = match kind {
            0 => json!({"name": "John", "address": {"city": "London"}}),
            1 => json!({"name": "John"}),
            _ => json!({"address": {"city": "London"}}),
        };
        assert_eq!(data, Some(expected));
    }
}
