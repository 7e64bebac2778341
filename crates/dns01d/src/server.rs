//! Webhook HTTP listener
//!
//! Plain HTTP/1.1; TLS is terminated in front of the daemon. Routes:
//!
//! - `POST /apis/{group}/v1alpha1/{solver}`: challenge payload in, answered
//!   payload out (always `200` once the body decodes)
//! - `GET /healthz`: liveness probe

use std::convert::Infallible;
use std::sync::Arc;

use dns01_core::webhook::handle_payload;
use dns01_core::{ChallengePayload, SolverRegistry};
use dns01_core::traits::ShutdownSignal;
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::{Bytes, Incoming};
use hyper::header::{CONTENT_TYPE, HeaderValue};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

/// Version segment of the webhook API path
const API_VERSION: &str = "v1alpha1";

/// Largest challenge payload accepted (1 MiB)
const MAX_PAYLOAD_BYTES: usize = 1024 * 1024;

/// Shared state of all connections
pub struct WebhookState {
    group_name: String,
    registry: SolverRegistry,
}

impl WebhookState {
    pub fn new(group_name: impl Into<String>, registry: SolverRegistry) -> Self {
        Self {
            group_name: group_name.into(),
            registry,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Route {
    Health,
    Solve(String),
    MethodNotAllowed,
    NotFound,
}

impl Route {
    fn parse(method: &Method, path: &str, group_name: &str) -> Self {
        if path == "/healthz" {
            return if method == Method::GET {
                Route::Health
            } else {
                Route::MethodNotAllowed
            };
        }

        let mut segments = path.trim_start_matches('/').split('/');
        let solver = match (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) {
            (Some("apis"), Some(group), Some(API_VERSION), Some(solver), None)
                if group == group_name && !solver.is_empty() =>
            {
                solver
            }
            _ => return Route::NotFound,
        };

        if method == Method::POST {
            Route::Solve(solver.to_string())
        } else {
            Route::MethodNotAllowed
        }
    }
}

/// Accept connections until `shutdown` fires
pub async fn serve(
    listener: TcpListener,
    state: Arc<WebhookState>,
    mut shutdown: ShutdownSignal,
) -> anyhow::Result<()> {
    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                info!("Webhook listener shutting down");
                break;
            }
            result = listener.accept() => {
                let (stream, peer) = match result {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        warn!("Failed to accept connection: {}", e);
                        continue;
                    }
                };

                let io = TokioIo::new(stream);
                let state = state.clone();

                tokio::spawn(async move {
                    let service = service_fn(move |req| handle(req, state.clone()));
                    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                        debug!("Connection from {} ended with error: {}", peer, err);
                    }
                });
            }
        }
    }

    Ok(())
}

async fn handle(
    req: Request<Incoming>,
    state: Arc<WebhookState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let route = Route::parse(req.method(), req.uri().path(), &state.group_name);
    debug!("{} {} -> {:?}", req.method(), req.uri().path(), route);

    let response = match route {
        Route::Health => text_response(StatusCode::OK, "ok"),
        Route::Solve(solver) => solve(req, &solver, &state).await,
        Route::MethodNotAllowed => {
            text_response(StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
        }
        Route::NotFound => text_response(StatusCode::NOT_FOUND, "not found"),
    };

    Ok(response)
}

async fn solve(req: Request<Incoming>, solver: &str, state: &WebhookState) -> Response<Full<Bytes>> {
    let body = match Limited::new(req.into_body(), MAX_PAYLOAD_BYTES).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!("Failed to read challenge payload: {}", e);
            return text_response(StatusCode::BAD_REQUEST, "failed to read request body");
        }
    };

    let payload: ChallengePayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Malformed challenge payload: {}", e);
            return text_response(
                StatusCode::BAD_REQUEST,
                format!("malformed challenge payload: {}", e),
            );
        }
    };

    let answered = handle_payload(&state.registry, solver, payload).await;

    match serde_json::to_vec(&answered) {
        Ok(json) => response(StatusCode::OK, "application/json", json),
        Err(e) => {
            error!("Failed to encode challenge response: {}", e);
            text_response(StatusCode::INTERNAL_SERVER_ERROR, "failed to encode response")
        }
    }
}

fn text_response(status: StatusCode, text: impl Into<String>) -> Response<Full<Bytes>> {
    response(status, "text/plain; charset=utf-8", text.into())
}

fn response(
    status: StatusCode,
    content_type: &'static str,
    body: impl Into<Bytes>,
) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(body.into()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use dns01_core::{ChallengeRequest, Error, Result, SecretStoreConfig, Solver};
    use std::net::SocketAddr;
    use tokio::sync::watch;

    const GROUP: &str = "acme.example.com";

    #[test]
    fn test_route_solver_path() {
        assert_eq!(
            Route::parse(&Method::POST, "/apis/acme.example.com/v1alpha1/vkcloud-solver", GROUP),
            Route::Solve("vkcloud-solver".to_string())
        );
        assert_eq!(
            Route::parse(&Method::GET, "/apis/acme.example.com/v1alpha1/vkcloud-solver", GROUP),
            Route::MethodNotAllowed
        );
    }

    #[test]
    fn test_route_rejects_other_groups_and_shapes() {
        for path in [
            "/apis/other.example.com/v1alpha1/vkcloud-solver",
            "/apis/acme.example.com/v1beta1/vkcloud-solver",
            "/apis/acme.example.com/v1alpha1/",
            "/apis/acme.example.com/v1alpha1/vkcloud-solver/extra",
            "/",
        ] {
            assert_eq!(Route::parse(&Method::POST, path, GROUP), Route::NotFound, "{path}");
        }
    }

    #[test]
    fn test_route_health() {
        assert_eq!(Route::parse(&Method::GET, "/healthz", GROUP), Route::Health);
        assert_eq!(
            Route::parse(&Method::POST, "/healthz", GROUP),
            Route::MethodNotAllowed
        );
    }

    struct EchoSolver;

    #[async_trait]
    impl Solver for EchoSolver {
        fn name(&self) -> &str {
            "echo"
        }

        async fn present(&self, _request: &ChallengeRequest) -> Result<()> {
            Ok(())
        }

        async fn clean_up(&self, request: &ChallengeRequest) -> Result<()> {
            Err(Error::zone_not_found(request.resolved_zone.clone()))
        }

        async fn initialize(
            &self,
            _config: &SecretStoreConfig,
            _shutdown: ShutdownSignal,
        ) -> Result<()> {
            Ok(())
        }
    }

    async fn start() -> (SocketAddr, watch::Sender<bool>, tokio::task::JoinHandle<anyhow::Result<()>>) {
        let registry = SolverRegistry::new();
        registry.register(Arc::new(EchoSolver));
        let state = Arc::new(WebhookState::new(GROUP, registry));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(serve(listener, state, shutdown_rx));
        (addr, shutdown_tx, handle)
    }

    fn payload(action: &str) -> serde_json::Value {
        serde_json::json!({
            "apiVersion": "acme.cert-manager.io/v1alpha1",
            "kind": "ChallengePayload",
            "request": {
                "uid": "req-1",
                "action": action,
                "type": "dns-01",
                "key": "abc123",
                "resourceNamespace": "certs",
                "resolvedFQDN": "_acme-challenge.example.com.",
                "resolvedZone": "example.com."
            }
        })
    }

    #[tokio::test]
    async fn test_webhook_round_trip() {
        let (addr, shutdown_tx, handle) = start().await;
        let client = reqwest::Client::new();
        let url = format!("http://{}/apis/{}/v1alpha1/echo", addr, GROUP);

        let answered: serde_json::Value = client
            .post(&url)
            .json(&payload("Present"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(answered["response"]["uid"], "req-1");
        assert_eq!(answered["response"]["success"], true);

        let answered: serde_json::Value = client
            .post(&url)
            .json(&payload("CleanUp"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(answered["response"]["success"], false);
        assert_eq!(
            answered["response"]["status"]["message"],
            "Zone example.com. not found"
        );

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_health_and_bad_requests() {
        let (addr, shutdown_tx, handle) = start().await;
        let client = reqwest::Client::new();

        let health = client
            .get(format!("http://{}/healthz", addr))
            .send()
            .await
            .unwrap();
        assert_eq!(health.status(), 200);
        assert_eq!(health.text().await.unwrap(), "ok");

        let malformed = client
            .post(format!("http://{}/apis/{}/v1alpha1/echo", addr, GROUP))
            .body("{not json")
            .send()
            .await
            .unwrap();
        assert_eq!(malformed.status(), 400);

        let missing = client
            .post(format!("http://{}/apis/other/v1alpha1/echo", addr))
            .json(&payload("Present"))
            .send()
            .await
            .unwrap();
        assert_eq!(missing.status(), 404);

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap().unwrap();
    }
}
