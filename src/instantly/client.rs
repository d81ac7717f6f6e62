//! Instantly v2 API client wrapper.

use std::future::Future;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::INSTANTLY_BASE_URL;
use crate::error::UpstreamError;
use crate::metrics::{self, UpstreamTimer};

use super::types::{AnalyticsWindow, Campaign, CampaignList};

const CAMPAIGNS_PATH: &str = "/campaigns";
const DAILY_PATH: &str = "/campaigns/analytics/daily";
const OVERVIEW_PATH: &str = "/campaigns/analytics/overview";

/// Campaign endpoints the analytics aggregator depends on.
pub trait CampaignApi: Send + Sync {
    /// List up to `limit` campaigns, in provider order.
    fn list_campaigns(
        &self,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<Campaign>, UpstreamError>> + Send;

    /// Per-day analytics for one campaign.
    fn daily_analytics(
        &self,
        campaign: &Campaign,
        window: &AnalyticsWindow,
    ) -> impl Future<Output = Result<Value, UpstreamError>> + Send;

    /// Aggregate analytics for one campaign, CRM events expanded.
    fn overview_analytics(
        &self,
        campaign: &Campaign,
        window: &AnalyticsWindow,
    ) -> impl Future<Output = Result<Value, UpstreamError>> + Send;
}

/// Instantly API client.
#[derive(Debug, Clone)]
pub struct InstantlyClient {
    /// HTTP client for API requests.
    http: reqwest::Client,
    /// API base URL without trailing slash.
    base_url: String,
    /// Bearer token.
    api_key: String,
}

impl InstantlyClient {
    /// Create a client for the public Instantly API.
    pub fn new(api_key: impl Into<String>) -> Result<Self, reqwest::Error> {
        Self::with_base_url(api_key, INSTANTLY_BASE_URL)
    }

    /// Create a client against another base URL.
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        // No request timeout: calls run until the server answers or the
        // connection drops.
        let http = reqwest::Client::builder()
            .tcp_nodelay(true)
            .tcp_keepalive(std::time::Duration::from_secs(30))
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Get the API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Authenticated GET returning a decoded body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        query: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let timer = UpstreamTimer::new(endpoint);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(query)
            .send()
            .await
            .map_err(|source| {
                metrics::inc_upstream_failures(endpoint);
                warn!(endpoint, error = %source, "Instantly request failed");
                UpstreamError::Request {
                    endpoint: endpoint.to_string(),
                    source,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            metrics::inc_upstream_failures(endpoint);
            let text = response.text().await.unwrap_or_default();
            let body = if text.is_empty() {
                Value::Null
            } else {
                serde_json::from_str(&text).unwrap_or(Value::String(text))
            };
            warn!(endpoint, status = %status, "Instantly returned an error status");
            return Err(UpstreamError::Status {
                endpoint: endpoint.to_string(),
                status,
                body,
            });
        }

        let bytes = response.bytes().await.map_err(|source| {
            metrics::inc_upstream_failures(endpoint);
            UpstreamError::Request {
                endpoint: endpoint.to_string(),
                source,
            }
        })?;

        let decoded = serde_json::from_slice(&bytes).map_err(|e| {
            metrics::inc_upstream_failures(endpoint);
            UpstreamError::Decode {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            }
        })?;

        debug!(endpoint, elapsed_ms = timer.elapsed_ms(), "Instantly call finished");
        Ok(decoded)
    }
}

impl CampaignApi for InstantlyClient {
    #[instrument(skip(self))]
    async fn list_campaigns(&self, limit: u32) -> Result<Vec<Campaign>, UpstreamError> {
        let list: CampaignList = self
            .get_json(CAMPAIGNS_PATH, &[("limit", limit.to_string())])
            .await?;

        debug!(
            count = list.items.len(),
            next_starting_after = list.next_starting_after.as_deref(),
            "Listed campaigns"
        );
        Ok(list.items)
    }

    #[instrument(skip(self, campaign, window), fields(campaign_id = %campaign.id))]
    async fn daily_analytics(
        &self,
        campaign: &Campaign,
        window: &AnalyticsWindow,
    ) -> Result<Value, UpstreamError> {
        self.get_json(
            DAILY_PATH,
            &[
                ("campaign_id", campaign.id.clone()),
                ("campaign_status", campaign.status.to_string()),
                ("start_date", window.start_param()),
                ("end_date", window.end_param()),
            ],
        )
        .await
    }

    #[instrument(skip(self, campaign, window), fields(campaign_id = %campaign.id))]
    async fn overview_analytics(
        &self,
        campaign: &Campaign,
        window: &AnalyticsWindow,
    ) -> Result<Value, UpstreamError> {
        self.get_json(
            OVERVIEW_PATH,
            &[
                ("id", campaign.id.clone()),
                ("campaign_status", campaign.status.to_string()),
                ("start_date", window.start_param()),
                ("end_date", window.end_param()),
                ("expand_crm_events", "true".to_string()),
            ],
        )
        .await
    }
}
