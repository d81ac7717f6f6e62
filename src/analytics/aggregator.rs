//! Campaign analytics fan-out.
//!
//! One branch per campaign, each running the daily and overview calls
//! side by side. Branches are joined positionally so the output keeps the
//! list order no matter which call finishes first.

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::error::UpstreamError;
use crate::instantly::{AnalyticsWindow, Campaign, CampaignApi};
use crate::metrics;

/// One campaign's merged analytics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsResult {
    /// Campaign display name.
    pub campaign_name: String,
    /// Campaign identifier.
    pub campaign_id: String,
    /// Provider status code.
    pub campaign_status: i64,
    /// Evergreen flag.
    pub campaign_is_evergreen: bool,
    /// Overview payload, verbatim.
    pub overview: Value,
    /// Daily payload, verbatim.
    pub daily: Value,
}

impl AnalyticsResult {
    /// Combine a campaign's identity with its two payloads.
    pub fn new(campaign: Campaign, overview: Value, daily: Value) -> Self {
        Self {
            campaign_name: campaign.name,
            campaign_id: campaign.id,
            campaign_status: campaign.status,
            campaign_is_evergreen: campaign.is_evergreen,
            overview,
            daily,
        }
    }
}

/// Fetch and merge analytics for up to `limit` campaigns.
///
/// Fails with [`UpstreamError::Empty`] when the list is empty. Any failing
/// call fails the whole aggregation; siblings already in flight still run
/// to completion and the first failure in campaign order is returned.
#[instrument(skip(api, window), fields(start = %window.start, end = %window.end))]
pub async fn aggregate_campaign_analytics<C: CampaignApi>(
    api: &C,
    limit: u32,
    window: &AnalyticsWindow,
) -> Result<Vec<AnalyticsResult>, UpstreamError> {
    let campaigns = api.list_campaigns(limit).await?;
    if campaigns.is_empty() {
        warn!("Campaign list came back empty");
        return Err(UpstreamError::Empty);
    }

    debug!(count = campaigns.len(), "Fetching analytics per campaign");

    let branches: Vec<_> = campaigns
        .iter()
        .map(|campaign| campaign_branch(api, campaign, window))
        .collect();
    let settled = join_all(branches).await;

    let mut results = Vec::with_capacity(campaigns.len());
    for (campaign, outcome) in campaigns.into_iter().zip(settled) {
        let (daily, overview) = outcome?;
        results.push(AnalyticsResult::new(campaign, overview, daily));
    }

    metrics::record_campaigns_aggregated(results.len());
    info!(campaigns = results.len(), "Aggregated campaign analytics");

    Ok(results)
}

/// Daily and overview for one campaign. Both calls always settle.
async fn campaign_branch<C: CampaignApi>(
    api: &C,
    campaign: &Campaign,
    window: &AnalyticsWindow,
) -> Result<(Value, Value), UpstreamError> {
    let (daily, overview) = tokio::join!(
        api.daily_analytics(campaign, window),
        api.overview_analytics(campaign, window),
    );

    Ok((daily?, overview?))
}
