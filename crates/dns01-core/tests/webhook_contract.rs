//! Contract Test: Webhook Payload Handling
//!
//! Verifies that orchestrator payloads are dispatched to the named solver
//! and that every outcome is reported in the payload response.

mod common;

use common::*;
use dns01_core::webhook::handle_payload;
use dns01_core::{ChallengePayload, ChallengeSolver, SolverRegistry};
use std::sync::Arc;

async fn registry(connector: &FakeConnector) -> SolverRegistry {
    let registry = SolverRegistry::new();
    registry.register(Arc::new(ChallengeSolver::with_secret_store(
        "fake-solver",
        connector.clone(),
        Arc::new(populated_store().await),
    )));
    registry
}

fn payload(action: &str, zone: &str) -> ChallengePayload {
    serde_json::from_value(serde_json::json!({
        "apiVersion": "acme.cert-manager.io/v1alpha1",
        "kind": "ChallengePayload",
        "request": {
            "uid": "6f1c2a9e",
            "action": action,
            "type": "dns-01",
            "dnsName": "foo.example.com",
            "key": "abc123",
            "resourceNamespace": NAMESPACE,
            "resolvedFQDN": "_acme-challenge.foo.example.com.",
            "resolvedZone": zone,
            "allowAmbientCredentials": false,
            "config": solver_config()
        }
    }))
    .unwrap()
}

#[tokio::test]
async fn present_and_clean_up_payloads_succeed() {
    let connector = FakeConnector::new().with_zone("example.com", "z1");
    let registry = registry(&connector).await;

    let answered = handle_payload(&registry, "fake-solver", payload("Present", "example.com.")).await;
    let response = answered.response.unwrap();
    assert!(response.success);
    assert_eq!(response.uid, "6f1c2a9e");
    assert_eq!(connector.records("example.com").len(), 1);

    let answered = handle_payload(&registry, "fake-solver", payload("CleanUp", "example.com.")).await;
    assert!(answered.response.unwrap().success);
    assert!(connector.records("example.com").is_empty());
}

#[tokio::test]
async fn solver_failure_is_reported_with_message() {
    let connector = FakeConnector::new().with_zone("example.com", "z1");
    let registry = registry(&connector).await;

    let answered = handle_payload(&registry, "fake-solver", payload("Present", "nope.test.")).await;
    let response = answered.response.as_ref().unwrap();
    assert!(!response.success);
    assert_eq!(
        response.status.as_ref().unwrap().message,
        "Zone nope.test. not found"
    );

    let json = serde_json::to_value(&answered).unwrap();
    assert_eq!(json["response"]["success"], serde_json::json!(false));
}

#[tokio::test]
async fn unknown_solver_is_reported() {
    let connector = FakeConnector::new().with_zone("example.com", "z1");
    let registry = registry(&connector).await;

    let answered = handle_payload(&registry, "other-solver", payload("Present", "example.com.")).await;
    let response = answered.response.unwrap();
    assert!(!response.success);
    assert!(response.status.unwrap().message.contains("other-solver"));
    assert_eq!(connector.authenticate_calls(), 0);
}
