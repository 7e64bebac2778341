// # Solver Trait
//
// The operations the orchestrator drives. A webhook process can serve
// several solvers; they are told apart by `name()`.

use async_trait::async_trait;

use crate::challenge::ChallengeRequest;
use crate::config::SecretStoreConfig;

/// Signal fired when the webhook process is shutting down
pub type ShutdownSignal = tokio::sync::watch::Receiver<bool>;

/// Trait for DNS-01 challenge solvers
#[async_trait]
pub trait Solver: Send + Sync {
    /// Unique name of this solver within the webhook's API group
    fn name(&self) -> &str;

    /// Publish the challenge record
    ///
    /// Must tolerate being called more than once with the same request.
    async fn present(&self, request: &ChallengeRequest) -> Result<(), crate::Error>;

    /// Remove the challenge record whose content equals `request.key`
    ///
    /// Other records under the same name are left alone, so concurrent
    /// validations for one domain do not interfere. Succeeds if the record
    /// is already gone.
    async fn clean_up(&self, request: &ChallengeRequest) -> Result<(), crate::Error>;

    /// Called once when the webhook starts, before any present/clean-up
    async fn initialize(
        &self,
        config: &SecretStoreConfig,
        shutdown: ShutdownSignal,
    ) -> Result<(), crate::Error>;
}
