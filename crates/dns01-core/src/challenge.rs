//! Challenge request and response types exchanged with the orchestrator
//!
//! The JSON shape follows cert-manager's `ChallengePayload`
//! (`acme.cert-manager.io/v1alpha1`), so field names are camelCase and the
//! resolved FQDN is spelled `resolvedFQDN`.

use serde::{Deserialize, Serialize};

/// API version stamped on payloads the webhook answers with
pub const CHALLENGE_API_VERSION: &str = "acme.cert-manager.io/v1alpha1";

/// Kind stamped on payloads the webhook answers with
pub const CHALLENGE_KIND: &str = "ChallengePayload";

/// Which lifecycle operation the orchestrator is asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeAction {
    /// Publish the verification record
    Present,
    /// Remove the verification record
    CleanUp,
}

/// A single DNS-01 challenge to present or clean up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRequest {
    /// Request identifier, echoed back in the response
    #[serde(default)]
    pub uid: String,

    /// Requested operation
    pub action: ChallengeAction,

    /// Challenge type; always "dns-01" for this webhook
    #[serde(default, rename = "type")]
    pub challenge_type: String,

    /// Domain name the certificate is requested for
    #[serde(default)]
    pub dns_name: String,

    /// Verification token to publish as the record content
    pub key: String,

    /// Namespace used to look up referenced secrets
    #[serde(default)]
    pub resource_namespace: String,

    /// Fully-qualified name the record must be created under
    #[serde(rename = "resolvedFQDN")]
    pub resolved_fqdn: String,

    /// Zone the orchestrator resolved as authoritative for `resolved_fqdn`
    pub resolved_zone: String,

    /// Whether ambient credentials may be used (unused by this webhook)
    #[serde(default)]
    pub allow_ambient_credentials: bool,

    /// Opaque per-issuer solver configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

impl ChallengeRequest {
    /// Create a request with the fields the solver consumes
    pub fn new(
        action: ChallengeAction,
        resolved_fqdn: impl Into<String>,
        resolved_zone: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            uid: String::new(),
            action,
            challenge_type: "dns-01".to_string(),
            dns_name: String::new(),
            key: key.into(),
            resource_namespace: String::new(),
            resolved_fqdn: resolved_fqdn.into(),
            resolved_zone: resolved_zone.into(),
            allow_ambient_credentials: false,
            config: None,
        }
    }

    /// Set the namespace used for secret lookups
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.resource_namespace = namespace.into();
        self
    }

    /// Attach per-call solver configuration
    pub fn with_config(mut self, config: serde_json::Value) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the request identifier
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = uid.into();
        self
    }
}

/// Status detail attached to a failed response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeStatus {
    /// Human-readable failure description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

/// Outcome of one challenge request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeResponse {
    /// Identifier of the request this answers
    pub uid: String,

    /// Whether the operation succeeded
    pub success: bool,

    /// Failure detail, absent on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ChallengeStatus>,
}

impl ChallengeResponse {
    /// Successful response for the given request id
    pub fn success(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            success: true,
            status: None,
        }
    }

    /// Failed response carrying a message
    pub fn failure(uid: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            success: false,
            status: Some(ChallengeStatus {
                message: message.into(),
            }),
        }
    }
}

/// Envelope the orchestrator posts and the webhook answers with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengePayload {
    /// API version of the envelope
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Kind of the envelope
    #[serde(default = "default_kind")]
    pub kind: String,

    /// The challenge to act on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<ChallengeRequest>,

    /// Filled in by the webhook
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ChallengeResponse>,
}

impl ChallengePayload {
    /// Wrap a request in a fresh envelope
    pub fn for_request(request: ChallengeRequest) -> Self {
        Self {
            api_version: default_api_version(),
            kind: default_kind(),
            request: Some(request),
            response: None,
        }
    }
}

fn default_api_version() -> String {
    CHALLENGE_API_VERSION.to_string()
}

fn default_kind() -> String {
    CHALLENGE_KIND.to_string()
}
