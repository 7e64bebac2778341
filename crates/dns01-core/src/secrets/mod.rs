// # Secret Store Implementations
//
// This module provides implementations of the SecretStore trait and the
// constructor used by `Solver::initialize`.

pub mod directory;
pub mod memory;

pub use directory::DirectorySecretStore;
pub use memory::MemorySecretStore;

use std::sync::Arc;

use crate::config::SecretStoreConfig;
use crate::error::Result;
use crate::traits::SecretStore;

/// Build the secret store described by `config`
///
/// Errors are reported as `Error::ClientConstruction`.
pub async fn build_secret_store(config: &SecretStoreConfig) -> Result<Arc<dyn SecretStore>> {
    match config {
        SecretStoreConfig::Directory { path } => {
            Ok(Arc::new(DirectorySecretStore::new(path).await?))
        }
        SecretStoreConfig::Memory => Ok(Arc::new(MemorySecretStore::new())),
    }
}
