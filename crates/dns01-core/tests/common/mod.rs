//! Test doubles and common utilities for solver contract tests
//!
//! `FakeConnector` stands in for a DNS provider: it keeps zones and their
//! TXT records in memory and counts every call, so tests can check what
//! the solver did without any network.

#![allow(dead_code)]

use async_trait::async_trait;
use dns01_core::error::{Error, Result};
use dns01_core::traits::{ProviderConnector, ProviderSession, Record, Zone};
use dns01_core::{AuthParameters, MemorySecretStore};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const NAMESPACE: &str = "certs";
pub const SECRET: &str = "vk";

#[derive(Default)]
struct ProviderState {
    /// zone name (no trailing dot) -> (uuid, records)
    zones: HashMap<String, (String, Vec<Record>)>,
    next_record: usize,
    fail_listing: bool,
}

/// In-memory provider with call counters
#[derive(Clone, Default)]
pub struct FakeConnector {
    state: Arc<Mutex<ProviderState>>,
    authenticate_calls: Arc<AtomicUsize>,
    create_calls: Arc<AtomicUsize>,
    delete_calls: Arc<AtomicUsize>,
    last_params: Arc<Mutex<Option<AuthParameters>>>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an empty zone
    pub fn with_zone(self, zone: &str, uuid: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .zones
            .insert(zone.to_string(), (uuid.to_string(), Vec::new()));
        self
    }

    /// Make record listings fail with a provider error
    pub fn fail_listing(&self) {
        self.state.lock().unwrap().fail_listing = true;
    }

    /// Records currently in `zone`
    pub fn records(&self, zone: &str) -> Vec<Record> {
        self.state
            .lock()
            .unwrap()
            .zones
            .get(zone)
            .map(|(_, records)| records.clone())
            .unwrap_or_default()
    }

    pub fn authenticate_calls(&self) -> usize {
        self.authenticate_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Parameters of the most recent authenticate call
    pub fn last_params(&self) -> Option<AuthParameters> {
        self.last_params.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProviderConnector for FakeConnector {
    async fn authenticate(&self, params: &AuthParameters) -> Result<Box<dyn ProviderSession>> {
        self.authenticate_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_params.lock().unwrap() = Some(params.clone());

        if params.password != "s3cret" {
            return Err(Error::auth("invalid credentials"));
        }

        Ok(Box::new(FakeSession {
            connector: self.clone(),
        }))
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

struct FakeSession {
    connector: FakeConnector,
}

#[async_trait]
impl ProviderSession for FakeSession {
    async fn get_zone(&self, name: &str) -> Result<Zone> {
        let wanted = name.strip_suffix('.').unwrap_or(name);
        let state = self.connector.state.lock().unwrap();
        state
            .zones
            .get(wanted)
            .map(|(uuid, _)| Zone {
                uuid: uuid.clone(),
                zone: wanted.to_string(),
            })
            .ok_or_else(|| Error::zone_not_found(name))
    }

    async fn find_record_by_content(&self, zone: &Zone, content: &str) -> Result<Record> {
        let state = self.connector.state.lock().unwrap();
        if state.fail_listing {
            return Err(Error::provider("fake", "HTTP 500: listing failed"));
        }
        state
            .zones
            .get(&zone.zone)
            .and_then(|(_, records)| records.iter().find(|r| r.content == content).cloned())
            .ok_or_else(|| Error::record_not_found(zone.zone.clone()))
    }

    async fn create_record(&self, zone: &Zone, record: &Record) -> Result<()> {
        self.connector.create_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.connector.state.lock().unwrap();
        state.next_record += 1;
        let uuid = format!("r{}", state.next_record);
        let (_, records) = state
            .zones
            .get_mut(&zone.zone)
            .ok_or_else(|| Error::zone_not_found(zone.zone.clone()))?;
        records.push(Record {
            uuid,
            ..record.clone()
        });
        Ok(())
    }

    async fn delete_record(&self, zone: &Zone, record: &Record) -> Result<()> {
        self.connector.delete_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.connector.state.lock().unwrap();
        let (_, records) = state
            .zones
            .get_mut(&zone.zone)
            .ok_or_else(|| Error::zone_not_found(zone.zone.clone()))?;
        records.retain(|r| r.uuid != record.uuid);
        Ok(())
    }
}

/// Secret store holding a complete credential set in `NAMESPACE/SECRET`
pub async fn populated_store() -> MemorySecretStore {
    let store = MemorySecretStore::new();
    store
        .insert(NAMESPACE, SECRET, "auth_url", "https://identity.example/v3/")
        .await;
    store.insert(NAMESPACE, SECRET, "username", "admin").await;
    store.insert(NAMESPACE, SECRET, "password", "s3cret\n").await;
    store.insert(NAMESPACE, SECRET, "project_id", "tenant-1").await;
    store.insert(NAMESPACE, SECRET, "domain", "users").await;
    store
}

/// Solver config referencing the keys of [`populated_store`]
pub fn solver_config() -> serde_json::Value {
    serde_json::json!({
        "osAuthUrlSecretRef": { "name": SECRET, "key": "auth_url" },
        "osUsernameSecretRef": { "name": SECRET, "key": "username" },
        "osPasswordSecretRef": { "name": SECRET, "key": "password" },
        "osProjectIDSecretRef": { "name": SECRET, "key": "project_id" },
        "osDomainNameSecretRef": { "name": SECRET, "key": "domain" }
    })
}
