//! Core traits for the DNS-01 webhook
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`Solver`]: Operations the orchestrator drives
//! - [`SecretStore`]: Read-only access to referenced secrets
//! - [`ProviderConnector`] / [`ProviderSession`]: Authenticated zone and record access

pub mod dns_provider;
pub mod secret_store;
pub mod solver;

pub use dns_provider::{ProviderConnector, ProviderSession, Record, Zone};
pub use secret_store::{SecretData, SecretStore};
pub use solver::{ShutdownSignal, Solver};
