//! HTTP client for the remote verification service.
//!
//! [`VerificationClient::check`] is an ordinary future: it never blocks the calling
//! thread and resolves on whichever tokio worker drives it. [`VerificationClient::spawn_check`]
//! hands the call to the runtime instead, so the outcome is produced on a worker thread.
//!
//! `configure` takes `&mut self`, so the base URL cannot change while a check borrows the
//! client. Configure once at startup, then clone the client into concurrent tasks; clones
//! share one connection pool. A base URL that does not parse is only reported when a check
//! runs, as a configuration failure.
//!
//! Connect and read phases are each bounded by the client timeout (30 seconds by default).
//! reqwest has no separate write timeout, so a stalled request upload is only caught once the
//! read timeout expires while waiting for the response.

use crate::core::envelope::{error_body_or_unknown, ServerEnvelope};
use crate::domain::model::{LocationQuery, Verification, VerificationOutcome};
use crate::utils::error::{Error, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tokio::task::JoinHandle;
use url::Url;

pub const CHECK_ENDPOINT: &str = "/api/v1/check";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const JSON_UTF8: &str = "application/json; charset=utf-8";

#[derive(Debug, Clone)]
pub struct VerificationClient {
    client: Client,
    base_url: Option<String>,
}

impl VerificationClient {
    /// Client with the default 30 second connect and read timeouts and no server URL.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()
            .map_err(|e| Error::ConfigError {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: None,
        })
    }

    /// Sets the server origin. One trailing `/` is dropped so the endpoint path joins cleanly.
    pub fn configure(&mut self, base_url: &str) {
        let normalized = base_url.strip_suffix('/').unwrap_or(base_url);
        tracing::debug!("Verification server set to {}", normalized);
        self.base_url = Some(normalized.to_string());
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Full URL of the check endpoint, once a base URL is configured.
    pub fn endpoint_url(&self) -> Option<String> {
        self.base_url
            .as_ref()
            .map(|base| format!("{}{}", base, CHECK_ENDPOINT))
    }

    /// Verifies one query. Every failure is folded into the returned outcome.
    pub async fn check(&self, query: &LocationQuery) -> VerificationOutcome {
        let outcome = VerificationOutcome::from(self.try_check(query).await);

        match &outcome {
            VerificationOutcome::Verified(v) => tracing::info!(
                "({}, {}) in {}: {}",
                query.latitude(),
                query.longitude(),
                query.country_code(),
                v.is_inside
            ),
            VerificationOutcome::Failed(f) => tracing::warn!(
                "Check for ({}, {}) in {} failed [{}]: {}",
                query.latitude(),
                query.longitude(),
                query.country_code(),
                f.category,
                f.reason
            ),
        }

        outcome
    }

    /// Runs the check on the tokio runtime and returns without waiting for it.
    pub fn spawn_check(&self, query: LocationQuery) -> JoinHandle<VerificationOutcome> {
        let client = self.clone();
        tokio::spawn(async move { client.check(&query).await })
    }

    async fn try_check(&self, query: &LocationQuery) -> Result<Verification> {
        let endpoint = self.endpoint_url().ok_or(Error::ServerUrlNotSet)?;
        let endpoint = parse_endpoint(&endpoint)?;

        let body = serde_json::to_string(query).map_err(|e| Error::InvalidQuery {
            field: "query".to_string(),
            value: format!("{:?}", query),
            reason: e.to_string(),
        })?;

        tracing::debug!("POST {} {}", endpoint, body);

        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, JSON_UTF8)
            .body(body)
            .send()
            .await
            .map_err(|e| Error::network(&e))?;

        let status = response.status();
        tracing::debug!("Verification response status: {}", status);

        // `text()` takes the response by value, so the body is released on every branch
        if !status.is_success() {
            let body = response.text().await.ok();
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: error_body_or_unknown(body),
            });
        }

        // the status line already arrived, so a broken body is a bad response, not a lost one
        let text = response.text().await.map_err(|e| Error::unreadable_body(&e))?;
        tracing::debug!("Verification response body: {}", text);

        ServerEnvelope::parse(&text)?.into_verification()
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint).map_err(|e| Error::InvalidServerUrl {
        url: endpoint.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Error::InvalidServerUrl {
            url: endpoint.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}
