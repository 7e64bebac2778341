// # DNS Provider Traits
//
// Defines the interface for authenticated zone and record access.
//
// ## Session Per Call
//
// A `ProviderConnector` is long-lived and holds no credentials. Each
// present/clean-up hands it fresh `AuthParameters` and receives a
// `ProviderSession` that lives for that one operation only. Sessions are
// never pooled or shared between calls, because the parameters differ from
// call to call.
//
// ## Implementations
//
// - VK Cloud: `dns01-provider-vkcloud` crate

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::credentials::AuthParameters;

/// A DNS zone as listed by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// Provider-assigned zone identifier
    pub uuid: String,
    /// Zone name without the trailing dot
    pub zone: String,
}

/// A TXT record within a zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Provider-assigned record identifier (empty until created)
    #[serde(default)]
    pub uuid: String,
    /// Record name relative to the zone
    pub name: String,
    /// Record content (the challenge token)
    pub content: String,
    /// Time-to-live in seconds
    pub ttl: u32,
}

impl Record {
    /// Describe a record that has not been created yet
    pub fn new(name: impl Into<String>, content: impl Into<String>, ttl: u32) -> Self {
        Self {
            uuid: String::new(),
            name: name.into(),
            content: content.into(),
            ttl,
        }
    }
}

/// Trait for authenticating against a DNS provider
///
/// # Trust Level: Untrusted
///
/// Connectors and the sessions they create perform HTTP calls to their
/// provider only. They must not retry, back off, or cache anything beyond a
/// single operation; the orchestrator owns retry policy.
#[async_trait]
pub trait ProviderConnector: Send + Sync {
    /// Authenticate and open a session scoped to one operation
    ///
    /// # Returns
    ///
    /// - `Ok(session)`: Authenticated session
    /// - `Err(Error::Authentication)`: The provider rejected the parameters
    /// - `Err(Error::Provider)`: Transport or protocol failure
    async fn authenticate(
        &self,
        params: &AuthParameters,
    ) -> Result<Box<dyn ProviderSession>, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Zone and record primitives on an authenticated session
#[async_trait]
pub trait ProviderSession: Send + Sync {
    /// Find the zone whose name equals `resolved_zone`
    ///
    /// A trailing root dot on `resolved_zone` is ignored. Matching is exact;
    /// there is no suffix matching.
    ///
    /// # Returns
    ///
    /// - `Ok(Zone)`: The matching zone
    /// - `Err(Error::ZoneNotFound)`: Carries `resolved_zone` as given
    async fn get_zone(&self, resolved_zone: &str) -> Result<Zone, crate::Error>;

    /// Find the first record in `zone` whose content equals `content`
    ///
    /// # Returns
    ///
    /// - `Ok(Record)`: The matching record, with its identifier
    /// - `Err(Error::RecordNotFound)`: No record carries `content`
    async fn find_record_by_content(&self, zone: &Zone, content: &str)
    -> Result<Record, crate::Error>;

    /// Create `record` in `zone`
    ///
    /// Does not check for an existing record and returns no identifier.
    async fn create_record(&self, zone: &Zone, record: &Record) -> Result<(), crate::Error>;

    /// Delete `record` from `zone` by its identifier
    async fn delete_record(&self, zone: &Zone, record: &Record) -> Result<(), crate::Error>;
}
