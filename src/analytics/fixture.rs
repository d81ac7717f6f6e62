//! Fixed sample dataset served in mock mode.

/// Mock analytics response body, served as-is.
pub const MOCK_ANALYTICS_JSON: &str = include_str!("../../data/mock_analytics.json");
