// # Memory Secret Store
//
// In-memory implementation of SecretStore.
//
// Secrets are inserted by the embedding program (or a test) and never
// persisted. Useful for tests and for embedding the solver in a process
// that already holds credentials.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::secret_store::{SecretData, SecretStore};

/// In-memory secret store implementation
///
/// Secrets are keyed by `(scope, name)`.
///
/// # Example
///
/// ```rust,no_run
/// use dns01_core::secrets::MemorySecretStore;
/// use dns01_core::traits::SecretStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemorySecretStore::new();
///     store.insert("certs", "vk-creds", "password", "hunter2").await;
///
///     let secret = store.get_secret("certs", "vk-creds").await?;
///     assert_eq!(secret["password"], b"hunter2".to_vec());
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySecretStore {
    inner: Arc<RwLock<HashMap<(String, String), SecretData>>>,
}

impl MemorySecretStore {
    /// Create a new empty memory secret store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one key into a secret, creating the secret if needed
    pub async fn insert(
        &self,
        scope: impl Into<String>,
        name: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<Vec<u8>>,
    ) {
        let mut secrets = self.inner.write().await;
        secrets
            .entry((scope.into(), name.into()))
            .or_default()
            .insert(key.into(), value.into());
    }

    /// Replace a whole secret
    pub async fn insert_secret(
        &self,
        scope: impl Into<String>,
        name: impl Into<String>,
        data: SecretData,
    ) {
        self.inner
            .write()
            .await
            .insert((scope.into(), name.into()), data);
    }

    /// Remove a secret, returning whether it existed
    pub async fn remove(&self, scope: &str, name: &str) -> bool {
        self.inner
            .write()
            .await
            .remove(&(scope.to_string(), name.to_string()))
            .is_some()
    }

    /// Get the number of secrets in the store
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn get_secret(&self, scope: &str, name: &str) -> Result<SecretData, Error> {
        let secrets = self.inner.read().await;
        secrets
            .get(&(scope.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| Error::SecretNotFound {
                scope: scope.to_string(),
                name: name.to_string(),
            })
    }

    fn store_name(&self) -> &'static str {
        "memory"
    }
}
