//! Configuration types for the DNS-01 webhook
//!
//! - [`SolverConfig`]: per-call configuration carried on each challenge request
//! - [`SecretStoreConfig`]: bootstrap configuration for reaching secrets

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Reference to one key inside a named secret
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretKeySelector {
    /// Secret name within the request's namespace
    pub name: String,
    /// Key within the secret
    pub key: String,
}

impl SecretKeySelector {
    /// Create a new selector
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
        }
    }
}

/// Per-call solver configuration
///
/// Set by users in the issuer's webhook `config` field. Every field points
/// at a secret holding one of the identity-service credentials; no
/// credentials appear here directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Identity service endpoint URL
    #[serde(rename = "osAuthUrlSecretRef")]
    pub auth_url_ref: SecretKeySelector,

    /// User name
    #[serde(rename = "osUsernameSecretRef")]
    pub username_ref: SecretKeySelector,

    /// User password
    #[serde(rename = "osPasswordSecretRef")]
    pub password_ref: SecretKeySelector,

    /// Project (tenant) ID
    #[serde(rename = "osProjectIDSecretRef")]
    pub project_id_ref: SecretKeySelector,

    /// User domain name
    #[serde(rename = "osDomainNameSecretRef")]
    pub domain_name_ref: SecretKeySelector,
}

impl SolverConfig {
    /// Decode the per-call configuration blob
    ///
    /// A missing blob is valid and yields the defaults.
    pub fn from_json(config: Option<&serde_json::Value>) -> Result<Self> {
        match config {
            None | Some(serde_json::Value::Null) => Ok(Self::default()),
            Some(value) => Self::deserialize(value).map_err(Error::ConfigDecode),
        }
    }
}

/// How the solver reaches the secret store
///
/// This is the bootstrap configuration handed to `Solver::initialize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SecretStoreConfig {
    /// Secrets mounted as files under `{path}/{scope}/{name}/{key}`
    Directory {
        /// Root directory of the mounted secrets
        path: PathBuf,
    },

    /// Empty in-memory store, for tests only
    ///
    /// Nothing can fill a store built from this variant, so every lookup
    /// fails with `SecretNotFound`. Programs embedding a solver with known
    /// credentials pass a populated store to
    /// `ChallengeSolver::with_secret_store` instead.
    Memory,
}

impl Default for SecretStoreConfig {
    fn default() -> Self {
        SecretStoreConfig::Directory {
            path: PathBuf::from("/var/run/secrets/dns01"),
        }
    }
}
