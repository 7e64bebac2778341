//! Authenticated VK Cloud DNS session
//!
//! A session lives for one present/clean-up. Every method performs exactly
//! one HTTP request and never retries.

use async_trait::async_trait;
use dns01_core::solver::un_fqdn;
use dns01_core::traits::{ProviderSession, Record, Zone};
use dns01_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::PROVIDER_NAME;

/// Header carrying the session token on DNS API requests
const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Zone entry as listed by `GET /tenants/:tenant_id/dns/`
#[derive(Debug, Deserialize)]
struct ZoneEntry {
    uuid: String,
    zone: String,
}

/// TXT record entry as listed by `GET .../dns/:zone_uuid/txt/`
#[derive(Debug, Deserialize)]
struct TxtRecordEntry {
    uuid: String,
    #[serde(default)]
    name: String,
    content: String,
    #[serde(default)]
    ttl: u32,
}

impl From<TxtRecordEntry> for Record {
    fn from(entry: TxtRecordEntry) -> Self {
        Record {
            uuid: entry.uuid,
            name: entry.name,
            content: entry.content,
            ttl: entry.ttl,
        }
    }
}

/// Body of `POST .../dns/:zone_uuid/txt/`
#[derive(Debug, Serialize)]
struct CreateTxtRecordRequest<'a> {
    content: &'a str,
    name: &'a str,
    ttl: u32,
}

/// Session bound to one token and one tenant
///
/// # Security
///
/// The Debug implementation does NOT expose the token.
pub struct VkCloudSession {
    client: reqwest::Client,
    /// ⚠️ NEVER log this value
    token: String,
    dns_api_base: String,
    tenant_id: String,
}

// Custom Debug implementation that hides the token
impl std::fmt::Debug for VkCloudSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VkCloudSession")
            .field("token", &"<REDACTED>")
            .field("dns_api_base", &self.dns_api_base)
            .field("tenant_id", &self.tenant_id)
            .finish()
    }
}

impl VkCloudSession {
    pub(crate) fn new(
        client: reqwest::Client,
        token: String,
        dns_api_base: String,
        tenant_id: String,
    ) -> Self {
        Self {
            client,
            token,
            dns_api_base,
            tenant_id,
        }
    }

    fn zones_url(&self) -> String {
        format!("{}/tenants/{}/dns/", self.dns_api_base, self.tenant_id)
    }

    fn records_url(&self, zone: &Zone) -> String {
        format!(
            "{}/tenants/{}/dns/{}/txt/",
            self.dns_api_base, self.tenant_id, zone.uuid
        )
    }

    /// Send a request with the session token and map failures
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        operation: &str,
    ) -> Result<reqwest::Response> {
        let response = request
            .header(AUTH_TOKEN_HEADER, &self.token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER_NAME, format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());

        let message = match status.as_u16() {
            401 | 403 => format!(
                "{} failed: token rejected or insufficient permissions. Status: {} - {}",
                operation, status, error_text
            ),
            429 => format!(
                "{} failed: rate limit exceeded. Status: {} - {}",
                operation, status, error_text
            ),
            500..=599 => format!(
                "{} failed: server error (transient): {} - {}",
                operation, status, error_text
            ),
            _ => format!("{} failed: {} - {}", operation, status, error_text),
        };

        Err(Error::provider(PROVIDER_NAME, message))
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        operation: &str,
    ) -> Result<T> {
        response.json::<T>().await.map_err(|e| {
            Error::provider(
                PROVIDER_NAME,
                format!("{} returned an unexpected response: {}", operation, e),
            )
        })
    }
}

#[async_trait]
impl ProviderSession for VkCloudSession {
    async fn get_zone(&self, resolved_zone: &str) -> Result<Zone> {
        let wanted = un_fqdn(resolved_zone);
        tracing::debug!("Looking up zone: {}", wanted);

        let response = self
            .send(self.client.get(self.zones_url()), "Zone listing")
            .await?;
        let zones: Vec<ZoneEntry> = Self::decode(response, "Zone listing").await?;

        zones
            .into_iter()
            .find(|z| z.zone == wanted)
            .map(|z| Zone {
                uuid: z.uuid,
                zone: z.zone,
            })
            .ok_or_else(|| Error::zone_not_found(resolved_zone))
    }

    async fn find_record_by_content(&self, zone: &Zone, content: &str) -> Result<Record> {
        tracing::debug!("Looking up TXT record by content in zone {}", zone.zone);

        let response = self
            .send(self.client.get(self.records_url(zone)), "Record listing")
            .await?;
        let records: Vec<TxtRecordEntry> = Self::decode(response, "Record listing").await?;

        records
            .into_iter()
            .find(|r| r.content == content)
            .map(Record::from)
            .ok_or_else(|| Error::record_not_found(zone.zone.clone()))
    }

    async fn create_record(&self, zone: &Zone, record: &Record) -> Result<()> {
        tracing::debug!("Creating TXT record {} in zone {}", record.name, zone.zone);

        let body = CreateTxtRecordRequest {
            content: &record.content,
            name: &record.name,
            ttl: record.ttl,
        };

        self.send(
            self.client.post(self.records_url(zone)).json(&body),
            "Record creation",
        )
        .await?;

        Ok(())
    }

    async fn delete_record(&self, zone: &Zone, record: &Record) -> Result<()> {
        if record.uuid.is_empty() {
            return Err(Error::provider(
                PROVIDER_NAME,
                format!("Cannot delete record {} without an identifier", record.name),
            ));
        }

        tracing::debug!("Deleting TXT record {} from zone {}", record.uuid, zone.zone);

        let url = format!("{}{}", self.records_url(zone), record.uuid);
        self.send(self.client.delete(url), "Record deletion").await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> VkCloudSession {
        VkCloudSession::new(
            reqwest::Client::new(),
            "secret_token_12345".to_string(),
            "https://mcs.mail.ru/public-dns/1.0.0".to_string(),
            "tenant-1".to_string(),
        )
    }

    #[test]
    fn test_urls() {
        let session = session();
        let zone = Zone {
            uuid: "z1".to_string(),
            zone: "example.com".to_string(),
        };

        assert_eq!(
            session.zones_url(),
            "https://mcs.mail.ru/public-dns/1.0.0/tenants/tenant-1/dns/"
        );
        assert_eq!(
            session.records_url(&zone),
            "https://mcs.mail.ru/public-dns/1.0.0/tenants/tenant-1/dns/z1/txt/"
        );
    }

    #[test]
    fn test_token_not_exposed_in_debug() {
        let debug_str = format!("{:?}", session());
        assert!(!debug_str.contains("secret_token_12345"));
        assert!(debug_str.contains("VkCloudSession"));
    }

    #[tokio::test]
    async fn test_delete_requires_identifier() {
        let zone = Zone {
            uuid: "z1".to_string(),
            zone: "example.com".to_string(),
        };
        let record = Record::new("_acme-challenge", "abc123", 3600);

        let err = session().delete_record(&zone, &record).await.unwrap_err();
        assert!(matches!(err, Error::Provider { .. }));
    }
}
