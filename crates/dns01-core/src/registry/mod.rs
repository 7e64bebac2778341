//! Plugin-based solver registry
//!
//! One webhook process can serve several solvers. The registry maps each
//! solver's `name()` to the solver so the webhook can dispatch requests by
//! the name in the request path.
//!
//! ## Registration
//!
//! Provider crates should register their solvers during initialization:
//!
//! ```rust,ignore
//! // In dns01-provider-vkcloud
//! pub fn register(registry: &SolverRegistry, dns_api_base: impl Into<String>) -> Result<()> {
//!     registry.register(Arc::new(solver(dns_api_base)?));
//!     Ok(())
//! }
//! ```

use crate::config::SecretStoreConfig;
use crate::error::Result;
use crate::traits::{ShutdownSignal, Solver};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Solver registry keyed by solver name
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// lookups and exclusive registration. Lookups hand out `Arc`s so no lock is
/// held while a solver runs.
#[derive(Default)]
pub struct SolverRegistry {
    solvers: RwLock<HashMap<String, Arc<dyn Solver>>>,
}

impl SolverRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a solver under its own name
    ///
    /// A solver registered under an existing name replaces the old one.
    pub fn register(&self, solver: Arc<dyn Solver>) {
        let name = solver.name().to_string();
        let mut solvers = self.solvers.write().unwrap_or_else(PoisonError::into_inner);
        if solvers.insert(name.clone(), solver).is_some() {
            tracing::warn!("Replaced previously registered solver: {}", name);
        }
    }

    /// Look up a solver by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Solver>> {
        let solvers = self.solvers.read().unwrap_or_else(PoisonError::into_inner);
        solvers.get(name).cloned()
    }

    /// Check if a solver is registered
    pub fn has(&self, name: &str) -> bool {
        let solvers = self.solvers.read().unwrap_or_else(PoisonError::into_inner);
        solvers.contains_key(name)
    }

    /// List all registered solver names, sorted
    pub fn list(&self) -> Vec<String> {
        let solvers = self.solvers.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = solvers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Initialize every registered solver
    ///
    /// Stops at the first failure.
    pub async fn initialize_all(
        &self,
        config: &SecretStoreConfig,
        shutdown: ShutdownSignal,
    ) -> Result<()> {
        // Release the lock before calling async initialize
        let solvers: Vec<Arc<dyn Solver>> = {
            let solvers = self.solvers.read().unwrap_or_else(PoisonError::into_inner);
            solvers.values().cloned().collect()
        };

        for solver in solvers {
            solver.initialize(config, shutdown.clone()).await?;
        }

        Ok(())
    }
}
