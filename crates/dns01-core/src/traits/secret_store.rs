// # Secret Store Trait
//
// Defines the interface for resolving secret references.
//
// ## Purpose
//
// Solver configuration never carries credentials directly. It names secrets
// (scope + name + key) and the secret store turns those names into values.
//
// ## Implementations
//
// - Memory: `MemorySecretStore` (tests, embedding)
// - Directory: `DirectorySecretStore` (secrets mounted as files)

use async_trait::async_trait;
use std::collections::HashMap;

/// Contents of one secret: key → raw value
pub type SecretData = HashMap<String, Vec<u8>>;

/// Trait for secret store implementations
///
/// Implementations are only ever read from and must be safe to call
/// concurrently from many in-flight challenges without extra locking.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch a whole secret
    ///
    /// # Parameters
    ///
    /// - `scope`: Namespace the secret lives in
    /// - `name`: Secret name
    ///
    /// # Returns
    ///
    /// - `Ok(SecretData)`: All keys of the secret
    /// - `Err(Error::SecretNotFound)`: No such secret in `scope`
    /// - `Err(Error)`: Any other storage failure
    async fn get_secret(&self, scope: &str, name: &str) -> Result<SecretData, crate::Error>;

    /// Get the store name (for logging/debugging)
    fn store_name(&self) -> &'static str;
}
