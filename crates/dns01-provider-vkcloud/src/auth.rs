//! Identity service authentication
//!
//! Keystone v3 password authentication scoped to a project:
//!
//! ```http
//! POST {identity}/v3/auth/tokens
//! Content-Type: application/json
//!
//! {"auth": {"identity": {"methods": ["password"], "password": {"user": {...}}},
//!           "scope": {"project": {"id": "..."}}}}
//! ```
//!
//! The token comes back in the `X-Subject-Token` response header.

use dns01_core::{AuthParameters, Error, Result};
use serde::Serialize;

use crate::PROVIDER_NAME;

/// Response header carrying the issued token
const SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    auth: AuthBody<'a>,
}

#[derive(Debug, Serialize)]
struct AuthBody<'a> {
    identity: Identity<'a>,
    scope: Scope<'a>,
}

#[derive(Debug, Serialize)]
struct Identity<'a> {
    methods: [&'static str; 1],
    password: PasswordMethod<'a>,
}

#[derive(Debug, Serialize)]
struct PasswordMethod<'a> {
    user: User<'a>,
}

#[derive(Debug, Serialize)]
struct User<'a> {
    name: &'a str,
    password: &'a str,
    domain: Named<'a>,
}

#[derive(Debug, Serialize)]
struct Named<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct Scope<'a> {
    project: ProjectId<'a>,
}

#[derive(Debug, Serialize)]
struct ProjectId<'a> {
    id: &'a str,
}

impl<'a> TokenRequest<'a> {
    fn new(params: &'a AuthParameters) -> Self {
        Self {
            auth: AuthBody {
                identity: Identity {
                    methods: ["password"],
                    password: PasswordMethod {
                        user: User {
                            name: &params.username,
                            password: &params.password,
                            domain: Named {
                                name: &params.domain_name,
                            },
                        },
                    },
                },
                scope: Scope {
                    project: ProjectId {
                        id: &params.tenant_id,
                    },
                },
            },
        }
    }
}

/// Token endpoint for an identity endpoint URL
///
/// Accepts the endpoint with or without the `/v3` version suffix and with or
/// without a trailing slash.
pub(crate) fn token_url(identity_endpoint: &str) -> String {
    let base = identity_endpoint.trim_end_matches('/');
    if base.ends_with("/v3") {
        format!("{}/auth/tokens", base)
    } else {
        format!("{}/v3/auth/tokens", base)
    }
}

/// Request a project-scoped token
///
/// # Returns
///
/// - `Ok(token)`: The issued token
/// - `Err(Error::Authentication)`: Credentials rejected, or no token returned
/// - `Err(Error::Provider)`: Transport failure or unexpected status
pub(crate) async fn issue_token(client: &reqwest::Client, params: &AuthParameters) -> Result<String> {
    if params.identity_endpoint.is_empty() {
        return Err(Error::auth("identity endpoint is empty"));
    }

    let url = token_url(&params.identity_endpoint);
    tracing::debug!("Requesting token from {} for user {}", url, params.username);

    let response = client
        .post(&url)
        .json(&TokenRequest::new(params))
        .send()
        .await
        .map_err(|e| Error::provider(PROVIDER_NAME, format!("Token request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());

        return match status.as_u16() {
            400 | 401 | 403 => Err(Error::auth(format!(
                "identity service rejected credentials for user {}: {} - {}",
                params.username, status, error_text
            ))),
            _ => Err(Error::provider(
                PROVIDER_NAME,
                format!("Token request failed: {} - {}", status, error_text),
            )),
        };
    }

    let token = response
        .headers()
        .get(SUBJECT_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| Error::auth(format!("identity service returned no {} header", SUBJECT_TOKEN_HEADER)))?;

    tracing::debug!("Obtained token for tenant {}", params.tenant_id);
    Ok(token.to_string())
}
