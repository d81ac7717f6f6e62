//! Mock Instantly client for unit testing.
//!
//! Serves campaigns and analytics payloads from memory without making
//! network requests, with switches to fail individual calls.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::error::UpstreamError;

use super::client::CampaignApi;
use super::types::{AnalyticsWindow, Campaign};

/// Configuration for mock client behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Whether to fail the campaign list request.
    pub fail_list: bool,
    /// Campaign ids whose daily request fails.
    pub fail_daily_for: Vec<String>,
    /// Campaign ids whose overview request fails.
    pub fail_overview_for: Vec<String>,
    /// Simulated latency in milliseconds, per campaign id.
    pub latency_ms: HashMap<String, u64>,
}

#[derive(Debug, Default)]
struct MockData {
    campaigns: Vec<Campaign>,
    daily: HashMap<String, Value>,
    overview: HashMap<String, Value>,
    calls: Vec<String>,
}

/// Mock Instantly client for testing.
#[derive(Debug, Clone, Default)]
pub struct MockInstantlyClient {
    /// Mock configuration.
    config: MockConfig,
    /// Campaigns and analytics payloads.
    data: Arc<Mutex<MockData>>,
    /// Number of calls made through the client.
    call_count: Arc<AtomicUsize>,
    /// Number of calls that ran to the end.
    completed_count: Arc<AtomicUsize>,
    /// Calls currently inside their simulated latency.
    in_flight: Arc<AtomicUsize>,
    /// Highest value `in_flight` has reached.
    peak_in_flight: Arc<AtomicUsize>,
}

impl MockInstantlyClient {
    /// Create a new mock client with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock client with custom configuration.
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    fn data(&self) -> MutexGuard<'_, MockData> {
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Add a campaign with its daily and overview payloads.
    pub fn add_campaign(&self, campaign: Campaign, daily: Value, overview: Value) {
        let mut data = self.data();
        data.daily.insert(campaign.id.clone(), daily);
        data.overview.insert(campaign.id.clone(), overview);
        data.campaigns.push(campaign);
    }

    /// Total number of calls made.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Number of calls that finished their simulated latency.
    pub fn completed_count(&self) -> usize {
        self.completed_count.load(Ordering::SeqCst)
    }

    /// Most calls that were in flight at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Calls made so far, as `endpoint:campaign_id` entries.
    pub fn calls(&self) -> Vec<String> {
        self.data().calls.clone()
    }

    async fn record(&self, call: String, campaign_id: Option<&str>) {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.data().calls.push(call);

        let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(in_flight, Ordering::SeqCst);

        let latency = campaign_id
            .and_then(|id| self.config.latency_ms.get(id))
            .copied()
            .unwrap_or(0);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.completed_count.fetch_add(1, Ordering::SeqCst);
    }

    fn failure(endpoint: &str) -> UpstreamError {
        UpstreamError::Status {
            endpoint: endpoint.to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: json!({ "error": format!("mock {endpoint} failure") }),
        }
    }
}

impl CampaignApi for MockInstantlyClient {
    async fn list_campaigns(&self, limit: u32) -> Result<Vec<Campaign>, UpstreamError> {
        self.record("list".to_string(), None).await;

        if self.config.fail_list {
            return Err(Self::failure("list"));
        }

        Ok(self
            .data()
            .campaigns
            .iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn daily_analytics(
        &self,
        campaign: &Campaign,
        _window: &AnalyticsWindow,
    ) -> Result<Value, UpstreamError> {
        self.record(format!("daily:{}", campaign.id), Some(&campaign.id))
            .await;

        if self.config.fail_daily_for.contains(&campaign.id) {
            return Err(Self::failure("daily"));
        }

        Ok(self
            .data()
            .daily
            .get(&campaign.id)
            .cloned()
            .unwrap_or_else(|| json!([])))
    }

    async fn overview_analytics(
        &self,
        campaign: &Campaign,
        _window: &AnalyticsWindow,
    ) -> Result<Value, UpstreamError> {
        self.record(format!("overview:{}", campaign.id), Some(&campaign.id))
            .await;

        if self.config.fail_overview_for.contains(&campaign.id) {
            return Err(Self::failure("overview"));
        }

        Ok(self
            .data()
            .overview
            .get(&campaign.id)
            .cloned()
            .unwrap_or_else(|| json!({})))
    }
}
