// # dns01d - DNS-01 Webhook Daemon
//
// This daemon is a THIN integration layer:
// - DO NOT add challenge, credential or provider logic here
// - All solver logic lives in dns01-core and the provider crates
// - Configuration is via environment variables ONLY
//
// The dns01d daemon is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing the runtime and logging
// 3. Registering and initializing solvers
// 4. Serving the webhook API until SIGTERM/SIGINT
//
// ## Configuration
//
// - `GROUP_NAME`: API group the webhook is served under (required)
// - `DNS01_LISTEN_ADDR`: Listener address (default `0.0.0.0:8080`)
// - `DNS01_SECRETS_DIR`: Root of the mounted secrets, laid out
//   `{dir}/{namespace}/{secret}/{key}` (default `/var/run/secrets/dns01`)
// - `DNS01_VKCLOUD_DNS_API_URL`: VK Cloud DNS API base URL
//   (default `https://mcs.mail.ru/public-dns/1.0.0`)
// - `DNS01_LOG_LEVEL`: trace, debug, info, warn or error (default `info`)
//
// ## Example
//
// ```bash
// export GROUP_NAME=acme.example.com
// export DNS01_SECRETS_DIR=/var/run/secrets/dns01
//
// dns01d
// ```

mod server;

use anyhow::Result;
use dns01_core::{SecretStoreConfig, SolverRegistry};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SECRETS_DIR: &str = "/var/run/secrets/dns01";
const DEFAULT_VKCLOUD_DNS_API_URL: &str = "https://mcs.mail.ru/public-dns/1.0.0";

/// How long in-flight work may take after a shutdown signal
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DaemonExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DaemonExitCode> for ExitCode {
    fn from(code: DaemonExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
#[derive(Debug)]
struct Config {
    group_name: String,
    listen_addr: String,
    secrets_dir: PathBuf,
    vkcloud_dns_api_url: String,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`
    ///
    /// Unset and empty variables are treated the same.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let group_name = var("GROUP_NAME").ok_or_else(|| {
            anyhow::anyhow!(
                "GROUP_NAME must be specified. \
                Set it via: export GROUP_NAME=acme.example.com"
            )
        })?;

        Ok(Self {
            group_name,
            listen_addr: var("DNS01_LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string()),
            secrets_dir: var("DNS01_SECRETS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SECRETS_DIR)),
            vkcloud_dns_api_url: var("DNS01_VKCLOUD_DNS_API_URL")
                .unwrap_or_else(|| DEFAULT_VKCLOUD_DNS_API_URL.to_string()),
            log_level: var("DNS01_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        // The group name is a single path segment of the webhook URL
        if self.group_name.contains('/') || self.group_name.contains(char::is_whitespace) {
            anyhow::bail!(
                "GROUP_NAME '{}' is not a valid API group name",
                self.group_name
            );
        }

        if self.listen_addr.parse::<SocketAddr>().is_err() {
            anyhow::bail!(
                "DNS01_LISTEN_ADDR '{}' is not a valid socket address. \
                Expected host:port, e.g. 0.0.0.0:8080",
                self.listen_addr
            );
        }

        if !self.vkcloud_dns_api_url.starts_with("https://")
            && !self.vkcloud_dns_api_url.starts_with("http://")
        {
            anyhow::bail!(
                "DNS01_VKCLOUD_DNS_API_URL must use HTTP or HTTPS scheme. Got: {}",
                self.vkcloud_dns_api_url
            );
        }

        if self.log_level().is_none() {
            anyhow::bail!(
                "DNS01_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            );
        }

        Ok(())
    }

    fn log_level(&self) -> Option<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return DaemonExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return DaemonExitCode::ConfigError.into();
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level().unwrap_or(Level::INFO))
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DaemonExitCode::ConfigError.into();
    }

    info!("Starting dns01d daemon");
    info!(
        "Serving API group {} on {}",
        config.group_name, config.listen_addr
    );

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DaemonExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("Daemon error: {:#}", e);
            DaemonExitCode::RuntimeError
        } else {
            DaemonExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the daemon
async fn run_daemon(config: Config) -> Result<()> {
    let registry = SolverRegistry::new();

    #[cfg(feature = "vkcloud")]
    {
        info!("Registering VK Cloud solver");
        dns01_provider_vkcloud::register(&registry, config.vkcloud_dns_api_url.clone())?;
    }

    if registry.list().is_empty() {
        anyhow::bail!("No solvers were compiled into this build");
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let store_config = SecretStoreConfig::Directory {
        path: config.secrets_dir.clone(),
    };
    registry
        .initialize_all(&store_config, shutdown_rx.clone())
        .await?;
    info!("Initialized solvers: {}", registry.list().join(", "));

    let listener = TcpListener::bind(config.listen_addr.as_str()).await?;
    info!("Webhook listening on http://{}", listener.local_addr()?);

    let state = Arc::new(server::WebhookState::new(config.group_name, registry));
    let server = tokio::spawn(server::serve(listener, state, shutdown_rx));

    let signal = wait_for_shutdown().await?;
    info!("Received shutdown signal: {}", signal);
    info!("Shutting down daemon");

    // Every receiver (solvers and listener) observes this
    let _ = shutdown_tx.send(true);

    match tokio::time::timeout(SHUTDOWN_TIMEOUT, server).await {
        Ok(joined) => joined?,
        Err(_) => Err(anyhow::anyhow!(
            "Shutdown timeout after {:?}",
            SHUTDOWN_TIMEOUT
        )),
    }
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
