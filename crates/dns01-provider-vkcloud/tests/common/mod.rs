//! Fixtures for VK Cloud provider contract tests
//!
//! A single wiremock server plays both the identity service (under `/v3`)
//! and the public DNS API (under `/public-dns/1.0.0`).

#![allow(dead_code)]

use dns01_core::{AuthParameters, MemorySecretStore};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "gAAAAABtest-token";
pub const TENANT: &str = "tenant-1";
pub const NAMESPACE: &str = "certs";

/// DNS API base URL on the fixture server
pub fn dns_base(server: &MockServer) -> String {
    format!("{}/public-dns/1.0.0", server.uri())
}

/// Path of the zone listing on the fixture server
pub fn zones_path() -> String {
    format!("/public-dns/1.0.0/tenants/{}/dns/", TENANT)
}

/// Path of a zone's TXT records on the fixture server
pub fn records_path(zone_uuid: &str) -> String {
    format!("/public-dns/1.0.0/tenants/{}/dns/{}/txt/", TENANT, zone_uuid)
}

/// Auth parameters pointing at the fixture identity service
pub fn auth_params(server: &MockServer) -> AuthParameters {
    AuthParameters {
        identity_endpoint: format!("{}/v3/", server.uri()),
        username: "admin@example.com".to_string(),
        password: "s3cret".to_string(),
        tenant_id: TENANT.to_string(),
        domain_name: "users".to_string(),
    }
}

/// Identity service that issues `TOKEN` for any credentials
pub async fn mount_identity(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v3/auth/tokens"))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("X-Subject-Token", TOKEN)
                .set_body_json(serde_json::json!({ "token": { "methods": ["password"] } })),
        )
        .mount(server)
        .await;
}

/// Zone listing with a single `example.com` zone (uuid `z1`)
pub async fn mount_zones(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(zones_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "uuid": "z0", "zone": "other.org" },
            { "uuid": "z1", "zone": "example.com" }
        ])))
        .mount(server)
        .await;
}

/// Secret store holding credentials for the fixture server
pub async fn secret_store(server: &MockServer) -> MemorySecretStore {
    let params = auth_params(server);
    let store = MemorySecretStore::new();
    store
        .insert(NAMESPACE, "vk", "auth_url", params.identity_endpoint)
        .await;
    store.insert(NAMESPACE, "vk", "username", params.username).await;
    store.insert(NAMESPACE, "vk", "password", params.password).await;
    store.insert(NAMESPACE, "vk", "project_id", params.tenant_id).await;
    store.insert(NAMESPACE, "vk", "domain", params.domain_name).await;
    store
}

/// Solver config referencing the secrets in [`secret_store`]
pub fn solver_config() -> serde_json::Value {
    serde_json::json!({
        "osAuthUrlSecretRef": { "name": "vk", "key": "auth_url" },
        "osUsernameSecretRef": { "name": "vk", "key": "username" },
        "osPasswordSecretRef": { "name": "vk", "key": "password" },
        "osProjectIDSecretRef": { "name": "vk", "key": "project_id" },
        "osDomainNameSecretRef": { "name": "vk", "key": "domain" }
    })
}
