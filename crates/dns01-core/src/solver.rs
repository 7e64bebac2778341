//! Generic challenge solver
//!
//! `ChallengeSolver` implements [`Solver`] for any [`ProviderConnector`]:
//!
//! ```text
//! ChallengeRequest
//!       │
//!       ▼
//! SolverConfig::from_json ──▶ CredentialResolver::resolve ──▶ AuthParameters
//!                                                                  │
//!                                                                  ▼
//!                                       ProviderConnector::authenticate
//!                                                                  │
//!                                                                  ▼
//!                           ProviderSession::{get_zone, find_record_by_content,
//!                                             create_record, delete_record}
//! ```
//!
//! Every call resolves credentials and authenticates from scratch. The
//! session is a local of the call and is dropped when the call returns.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::challenge::ChallengeRequest;
use crate::config::{SecretStoreConfig, SolverConfig};
use crate::credentials::CredentialResolver;
use crate::error::{Error, Result};
use crate::secrets::build_secret_store;
use crate::traits::{
    ProviderConnector, ProviderSession, Record, SecretStore, ShutdownSignal, Solver, Zone,
};

/// TTL of created challenge records, in seconds
pub const CHALLENGE_RECORD_TTL: u32 = 3600;

/// Solver composing a secret store, a credential resolver and a provider
pub struct ChallengeSolver<C> {
    name: String,
    connector: C,
    secret_store: RwLock<Option<Arc<dyn SecretStore>>>,
}

impl<C: ProviderConnector> ChallengeSolver<C> {
    /// Create a solver that still needs `initialize` before use
    pub fn new(name: impl Into<String>, connector: C) -> Self {
        Self {
            name: name.into(),
            connector,
            secret_store: RwLock::new(None),
        }
    }

    /// Create a solver with an already-built secret store
    pub fn with_secret_store(
        name: impl Into<String>,
        connector: C,
        store: Arc<dyn SecretStore>,
    ) -> Self {
        Self {
            name: name.into(),
            connector,
            secret_store: RwLock::new(Some(store)),
        }
    }

    /// The provider connector this solver uses
    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Decode config, resolve credentials, authenticate and find the zone
    ///
    /// These are the steps present and clean-up share.
    async fn open_zone(
        &self,
        request: &ChallengeRequest,
    ) -> Result<(Box<dyn ProviderSession>, Zone)> {
        let config = SolverConfig::from_json(request.config.as_ref())?;
        debug!("Loaded solver config");

        let store = self
            .secret_store
            .read()
            .await
            .clone()
            .ok_or(Error::NotInitialized)?;

        let params = CredentialResolver::new(store)
            .resolve(&config, &request.resource_namespace)
            .await?;
        debug!("Resolved credentials for tenant {}", params.tenant_id);

        let session = self.connector.authenticate(&params).await?;
        debug!(
            "Authenticated with {} provider",
            self.connector.provider_name()
        );

        let zone = session.get_zone(&request.resolved_zone).await?;
        debug!("Found zone {} ({})", zone.zone, zone.uuid);

        Ok((session, zone))
    }
}

#[async_trait]
impl<C: ProviderConnector> Solver for ChallengeSolver<C> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn present(&self, request: &ChallengeRequest) -> Result<()> {
        info!(
            "Presenting challenge record for {} in zone {}",
            request.resolved_fqdn, request.resolved_zone
        );

        let (session, zone) = self.open_zone(request).await?;

        let record = Record::new(
            extract_record_name(&request.resolved_fqdn, &request.resolved_zone),
            request.key.clone(),
            CHALLENGE_RECORD_TTL,
        );

        // Repeated presents must not pile up duplicate records
        match session.find_record_by_content(&zone, &record.content).await {
            Ok(existing) => {
                info!(
                    "Challenge record already present: {} ({}) in zone {}",
                    existing.name, existing.uuid, zone.zone
                );
                return Ok(());
            }
            Err(Error::RecordNotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        session.create_record(&zone, &record).await?;
        info!(
            "Created challenge record {} in zone {} (ttl: {})",
            record.name, zone.zone, record.ttl
        );

        Ok(())
    }

    async fn clean_up(&self, request: &ChallengeRequest) -> Result<()> {
        info!(
            "Cleaning up challenge record for {} in zone {}",
            request.resolved_fqdn, request.resolved_zone
        );

        let (session, zone) = self.open_zone(request).await?;

        let record = match session.find_record_by_content(&zone, &request.key).await {
            Ok(record) => record,
            Err(Error::RecordNotFound { zone: searched }) => {
                warn!("Challenge record not found in zone {}, nothing to clean up", searched);
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        session.delete_record(&zone, &record).await?;
        info!(
            "Deleted challenge record {} ({}) from zone {}",
            record.name, record.uuid, zone.zone
        );

        Ok(())
    }

    async fn initialize(&self, config: &SecretStoreConfig, _shutdown: ShutdownSignal) -> Result<()> {
        let store = build_secret_store(config).await?;
        info!(
            "Solver {} initialized with {} secret store",
            self.name,
            store.store_name()
        );

        *self.secret_store.write().await = Some(store);
        Ok(())
    }
}

/// Strip a single trailing root dot
pub fn un_fqdn(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

/// Record name of `fqdn` relative to `zone`
///
/// `_acme-challenge.foo.example.com.` in zone `example.com.` gives
/// `_acme-challenge.foo`. Only a trailing zone suffix is removed; if `fqdn`
/// does not end in the zone, the unqualified name is returned whole.
pub fn extract_record_name(fqdn: &str, zone: &str) -> String {
    let name = un_fqdn(fqdn);
    let suffix = format!(".{}", un_fqdn(zone));

    name.strip_suffix(suffix.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| name.to_string())
}
