// Uptime Kuma status source
use crate::application::status_source::StatusSource;
use crate::domain::dashboard::Credentials;
use crate::domain::proxy::ProxyTarget;
use crate::domain::status::{summarize_monitors, StatusReport};
use crate::infrastructure::http_client::{build_client, describe_error, with_credentials, ClientOptions};
use anyhow::Context;
use async_trait::async_trait;
use std::time::Duration;

/// Tried in order until one returns JSON.
const STATUS_ENDPOINTS: &[&str] = &["/api/status-page", "/api/monitors", "/status", "/api/status"];

#[derive(Debug, Clone)]
pub struct UptimeKumaSource {
    client: reqwest::Client,
}

impl UptimeKumaSource {
    pub fn new(user_agent: &str, timeout: Duration) -> anyhow::Result<Self> {
        let mut options = ClientOptions::bounded(user_agent, timeout);
        options.follow_redirects = true;
        Ok(Self {
            client: build_client(&options)?,
        })
    }

    async fn fetch_json(
        &self,
        endpoint: &str,
        credentials: Option<&Credentials>,
    ) -> anyhow::Result<serde_json::Value> {
        let request = with_credentials(
            self.client
                .get(endpoint)
                .header(reqwest::header::ACCEPT, "application/json"),
            credentials,
        );

        let response = request
            .send()
            .await
            .map_err(|e| anyhow::anyhow!(describe_error(&e)))?;

        if !response.status().is_success() {
            anyhow::bail!("{} answered {}", endpoint, response.status());
        }

        response
            .json::<serde_json::Value>()
            .await
            .context("Response is not JSON")
    }
}

#[async_trait]
impl StatusSource for UptimeKumaSource {
    async fn fetch_status(&self, base_url: &str, credentials: Option<&Credentials>) -> StatusReport {
        if let Err(e) = ProxyTarget::parse(base_url) {
            return StatusReport::failure(format!("Failed to connect to UptimeKuma: {e}"));
        }
        let base = base_url.trim().trim_end_matches('/');

        for path in STATUS_ENDPOINTS {
            let endpoint = format!("{base}{path}");
            match self.fetch_json(&endpoint, credentials).await {
                Ok(raw) => {
                    tracing::debug!("UptimeKuma data from {}", path);
                    return summarize_monitors(&raw, base);
                }
                Err(e) => tracing::debug!("UptimeKuma endpoint {} skipped: {:#}", path, e),
            }
        }

        tracing::warn!("No UptimeKuma endpoint under {} returned data", base);
        StatusReport::no_data(base_url)
    }
}
