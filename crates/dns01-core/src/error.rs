//! Error types for the DNS-01 webhook
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for solver operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DNS-01 webhook
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed per-call solver configuration
    #[error("error decoding solver config: {0}")]
    ConfigDecode(#[source] serde_json::Error),

    /// A referenced secret does not exist in the given scope
    #[error("failed to load secret \"{scope}/{name}\": not found")]
    SecretNotFound {
        /// Scope (namespace) the secret was looked up in
        scope: String,
        /// Secret name
        name: String,
    },

    /// The secret exists but lacks the requested key
    #[error("no key \"{key}\" in secret \"{scope}/{name}\"")]
    SecretKeyNotFound {
        /// Requested key
        key: String,
        /// Scope (namespace) of the secret
        scope: String,
        /// Secret name
        name: String,
    },

    /// Secret store failures other than "not found"
    #[error("Secret store error: {0}")]
    SecretStore(String),

    /// The provider rejected the authentication parameters
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The requested zone is not visible to the authenticated tenant
    #[error("Zone {0} not found")]
    ZoneNotFound(String),

    /// No record in the zone carries the requested content
    #[error("Record not found for zone {zone}")]
    RecordNotFound {
        /// Zone that was searched
        zone: String,
    },

    /// Any other provider failure (transport, status, malformed response)
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// Building the secret store client during initialization failed
    #[error("Failed to construct client: {0}")]
    ClientConstruction(String),

    /// Present or clean-up was called before initialize
    #[error("Solver has not been initialized")]
    NotInitialized,

    /// Static configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a secret store error
    pub fn secret_store(msg: impl Into<String>) -> Self {
        Self::SecretStore(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a "zone not found" error
    pub fn zone_not_found(zone: impl Into<String>) -> Self {
        Self::ZoneNotFound(zone.into())
    }

    /// Create a "record not found" error
    pub fn record_not_found(zone: impl Into<String>) -> Self {
        Self::RecordNotFound { zone: zone.into() }
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a client construction error
    pub fn client_construction(msg: impl Into<String>) -> Self {
        Self::ClientConstruction(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this is the record lookup miss that clean-up absorbs
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RecordNotFound { .. })
    }
}
