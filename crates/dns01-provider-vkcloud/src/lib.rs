// # VK Cloud DNS Provider
//
// This crate provides the VK Cloud public DNS provider for the DNS-01
// webhook, plus the `vkcloud-solver` built on it.
//
// ## Behaviour
//
// - Authenticates against the OpenStack identity service (Keystone v3,
//   password method, project scope) on every present/clean-up
// - Lists zones and TXT records, creates and deletes TXT records
// - Maps every non-2xx response to a provider error carrying status and body
// - ❌ NO retry logic (owned by the orchestrator)
// - ❌ NO caching of tokens, zones or records between calls
// - ❌ NO background tasks
//
// ## Security Requirements
//
// - Passwords and tokens NEVER appear in logs or Debug output
// - Credentials come from referenced secrets only, never from solver config
//
// ## API Reference
//
// - Issue token: POST `{identity}/v3/auth/tokens`
// - List zones: GET `{base}/tenants/:tenant_id/dns/`
// - List TXT records: GET `{base}/tenants/:tenant_id/dns/:zone_uuid/txt/`
// - Create TXT record: POST `{base}/tenants/:tenant_id/dns/:zone_uuid/txt/`
// - Delete TXT record: DELETE `{base}/tenants/:tenant_id/dns/:zone_uuid/txt/:record_uuid`

mod auth;
mod session;

pub use session::VkCloudSession;

use async_trait::async_trait;
use dns01_core::traits::{ProviderConnector, ProviderSession};
use dns01_core::{AuthParameters, ChallengeSolver, Error, Result, SolverRegistry};
use std::sync::Arc;
use std::time::Duration;

/// VK Cloud public DNS API base URL
pub const VKCLOUD_DNS_API_BASE: &str = "https://mcs.mail.ru/public-dns/1.0.0";

/// Name the VK Cloud solver is registered under
pub const SOLVER_NAME: &str = "vkcloud-solver";

/// Provider name used in errors and logs
pub(crate) const PROVIDER_NAME: &str = "vkcloud";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Connector that opens authenticated VK Cloud DNS sessions
///
/// Holds no credentials: every call to `authenticate` performs a fresh
/// token request with the parameters it is given.
#[derive(Debug, Clone)]
pub struct VkCloudConnector {
    /// DNS API base URL, without trailing slash
    dns_api_base: String,

    /// HTTP client shared by the sessions this connector opens
    client: reqwest::Client,
}

impl VkCloudConnector {
    /// Create a connector for the DNS API at `dns_api_base`
    ///
    /// # Parameters
    ///
    /// - `dns_api_base`: DNS API base URL (see [`VKCLOUD_DNS_API_BASE`])
    pub fn new(dns_api_base: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::client_construction(format!("Failed to build HTTP client: {}", e)))?;

        let dns_api_base = dns_api_base.into().trim_end_matches('/').to_string();
        if dns_api_base.is_empty() {
            return Err(Error::config("VK Cloud DNS API base URL cannot be empty"));
        }

        Ok(Self {
            dns_api_base,
            client,
        })
    }

    /// Create a connector for the public VK Cloud DNS API
    pub fn public() -> Result<Self> {
        Self::new(VKCLOUD_DNS_API_BASE)
    }

    /// DNS API base URL this connector targets
    pub fn dns_api_base(&self) -> &str {
        &self.dns_api_base
    }
}

#[async_trait]
impl ProviderConnector for VkCloudConnector {
    async fn authenticate(&self, params: &AuthParameters) -> Result<Box<dyn ProviderSession>> {
        let token = auth::issue_token(&self.client, params).await?;

        Ok(Box::new(VkCloudSession::new(
            self.client.clone(),
            token,
            self.dns_api_base.clone(),
            params.tenant_id.clone(),
        )))
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

/// The VK Cloud solver
pub type VkCloudSolver = ChallengeSolver<VkCloudConnector>;

/// Build the VK Cloud solver for the DNS API at `dns_api_base`
pub fn solver(dns_api_base: impl Into<String>) -> Result<VkCloudSolver> {
    Ok(ChallengeSolver::new(
        SOLVER_NAME,
        VkCloudConnector::new(dns_api_base)?,
    ))
}

/// Register the VK Cloud solver with a registry
///
/// This function should be called during initialization to make the
/// solver available to the webhook.
///
/// # Example
///
/// ```rust
/// use dns01_core::SolverRegistry;
///
/// let registry = SolverRegistry::new();
/// dns01_provider_vkcloud::register(&registry, dns01_provider_vkcloud::VKCLOUD_DNS_API_BASE)
///     .unwrap();
/// assert!(registry.has("vkcloud-solver"));
/// ```
pub fn register(registry: &SolverRegistry, dns_api_base: impl Into<String>) -> Result<()> {
    registry.register(Arc::new(solver(dns_api_base)?));
    Ok(())
}
