// # dns01-core
//
// Core library for the DNS-01 challenge webhook.
//
// ## Architecture Overview
//
// This library provides everything a DNS-01 solver needs apart from the
// provider-specific HTTP calls:
// - **Solver**: Trait the orchestrator drives (present / clean up / initialize)
// - **SecretStore**: Trait for resolving secret references to plaintext values
// - **ProviderConnector / ProviderSession**: Traits for authenticated zone and record access
// - **CredentialResolver**: Turns per-call secret references into `AuthParameters`
// - **ChallengeSolver**: Generic solver composing the pieces above
// - **SolverRegistry**: Name-keyed registry of solvers served by one webhook
// - **webhook**: Maps orchestrator challenge payloads onto registered solvers
//
// ## Design Principles
//
// 1. **Stateless calls**: Every present/clean-up resolves credentials and
//    authenticates from scratch; nothing is cached between calls
// 2. **Typed errors**: "record not found" is a variant, not a string, so the
//    clean-up downgrade is checked by the compiler
// 3. **No retries**: Failures surface unchanged; the orchestrator owns retry
// 4. **Plugin-based**: Providers live in their own crates and register solvers

pub mod challenge;
pub mod config;
pub mod credentials;
pub mod error;
pub mod registry;
pub mod secrets;
pub mod solver;
pub mod traits;
pub mod webhook;

// Re-export core types for convenience
pub use challenge::{ChallengeAction, ChallengePayload, ChallengeRequest, ChallengeResponse};
pub use config::{SecretKeySelector, SecretStoreConfig, SolverConfig};
pub use credentials::{AuthParameters, CredentialResolver};
pub use error::{Error, Result};
pub use registry::SolverRegistry;
pub use secrets::{DirectorySecretStore, MemorySecretStore};
pub use solver::ChallengeSolver;
pub use traits::{ProviderConnector, ProviderSession, Record, SecretStore, Solver, Zone};
