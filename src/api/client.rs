//! Trade API client: read-only fetches for the dashboard views.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::models::{ExchangeConnection, Position, Provider, ProviderStats, UserBalance};

use super::normalize;
use super::types::{PositionsParams, ProvidersParams, StatsParams};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the copy-trading platform API. Fetches raw JSON and hands
/// it to the normalizer; no retry or request de-duplication happens here.
pub struct TradeApiClient {
    client: Client,
    base_url: String,
    token: String,
}

impl TradeApiClient {
    /// Create a new client with default settings.
    pub fn new(base_url: String, token: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    /// Fetch the providers list.
    pub async fn providers(&self, params: &ProvidersParams) -> Result<Vec<Provider>> {
        let payload = self.get_json("/user/providers", params).await?;
        Ok(normalize::providers_from_response(&payload)?)
    }

    /// Fetch a positions list (open, closed, or log).
    pub async fn positions(&self, params: &PositionsParams) -> Result<Vec<Position>> {
        let payload = self.get_json("/user/positions", params).await?;
        Ok(normalize::positions_from_response(&payload)?)
    }

    /// Fetch the balance summary for an exchange account.
    pub async fn balance(&self, internal_exchange_id: &str) -> Result<UserBalance> {
        let params = [("exchangeInternalId", internal_exchange_id)];
        let payload = self.get_json("/user/balance", &params).await?;
        Ok(normalize::balance_from_response(&payload)?)
    }

    /// Fetch the user's exchange connections.
    pub async fn exchange_connections(&self) -> Result<Vec<ExchangeConnection>> {
        let params: [(&str, &str); 0] = [];
        let payload = self.get_json("/user/exchanges", &params).await?;
        Ok(normalize::connections_from_response(&payload)?)
    }

    /// Fetch aggregate stats for signal providers.
    pub async fn provider_stats(&self, params: &StatsParams) -> Result<Vec<ProviderStats>> {
        let payload = self.get_json("/providers/profit/stats", params).await?;
        Ok(normalize::provider_stats_from_response(&payload)?)
    }

    async fn get_json<T: Serialize + ?Sized>(&self, path: &str, params: &T) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);

        debug!(url = %url, "Fetching trade API endpoint");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(params)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", path))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Request {} failed: {} - {}", path, status, body);
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", path))
    }
}
