//! Campaign analytics aggregation and the mock-mode dataset.

pub mod aggregator;
pub mod fixture;

pub use aggregator::{aggregate_campaign_analytics, AnalyticsResult};
pub use fixture::MOCK_ANALYTICS_JSON;
