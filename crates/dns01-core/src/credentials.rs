//! Credential resolution
//!
//! Turns the five secret references of a [`SolverConfig`] into concrete
//! [`AuthParameters`] by reading each referenced secret from a
//! [`SecretStore`]. One lookup per field; nothing is batched or cached.

use std::sync::Arc;

use crate::config::{SecretKeySelector, SolverConfig};
use crate::error::{Error, Result};
use crate::traits::SecretStore;

/// Identity-service credentials for one present/clean-up call
///
/// # Security
///
/// The Debug implementation does NOT expose the password.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthParameters {
    /// Identity service endpoint URL
    pub identity_endpoint: String,
    /// User name
    pub username: String,
    /// User password
    /// ⚠️ NEVER log this value
    pub password: String,
    /// Project (tenant) ID
    pub tenant_id: String,
    /// User domain name
    pub domain_name: String,
}

// Custom Debug implementation that hides the password
impl std::fmt::Debug for AuthParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthParameters")
            .field("identity_endpoint", &self.identity_endpoint)
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .field("tenant_id", &self.tenant_id)
            .field("domain_name", &self.domain_name)
            .finish()
    }
}

/// Resolves secret references against a secret store
#[derive(Clone)]
pub struct CredentialResolver {
    store: Arc<dyn SecretStore>,
}

impl CredentialResolver {
    /// Create a resolver reading from `store`
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self { store }
    }

    /// Resolve every credential field of `config` within `scope`
    ///
    /// Fields are resolved in order (auth URL, username, password, project
    /// ID, domain name) and the first failure is returned.
    ///
    /// # Returns
    ///
    /// - `Ok(AuthParameters)`: All five values
    /// - `Err(Error::SecretNotFound)`: A referenced secret does not exist
    /// - `Err(Error::SecretKeyNotFound)`: A secret lacks the referenced key
    pub async fn resolve(&self, config: &SolverConfig, scope: &str) -> Result<AuthParameters> {
        Ok(AuthParameters {
            identity_endpoint: self.secret_value(&config.auth_url_ref, scope).await?,
            username: self.secret_value(&config.username_ref, scope).await?,
            password: self.secret_value(&config.password_ref, scope).await?,
            tenant_id: self.secret_value(&config.project_id_ref, scope).await?,
            domain_name: self.secret_value(&config.domain_name_ref, scope).await?,
        })
    }

    async fn secret_value(&self, selector: &SecretKeySelector, scope: &str) -> Result<String> {
        let secret = self.store.get_secret(scope, &selector.name).await?;

        let raw = secret
            .get(&selector.key)
            .ok_or_else(|| Error::SecretKeyNotFound {
                key: selector.key.clone(),
                scope: scope.to_string(),
                name: selector.name.clone(),
            })?;

        let value = std::str::from_utf8(raw).map_err(|_| {
            Error::secret_store(format!(
                "Key \"{}\" in secret \"{}/{}\" is not valid UTF-8",
                selector.key, scope, selector.name
            ))
        })?;

        // Mounted secret files commonly end with a newline
        Ok(value.trim().to_string())
    }
}
