//! Instantly API types.
//!
//! Only the campaign identity fields are modelled. Analytics payloads stay
//! opaque [`serde_json::Value`]s and are passed through untouched.

use serde::{Deserialize, Serialize};
use time::macros::date;
use time::Date;

/// Campaign as returned by `GET /campaigns`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    /// Campaign identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Provider status code (0 draft, 1 active, 2 paused, 3 completed, ...).
    pub status: i64,
    /// Whether the campaign runs without an end date.
    #[serde(default)]
    pub is_evergreen: bool,
}

/// Page of campaigns from the list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CampaignList {
    /// Campaigns in provider order.
    #[serde(default)]
    pub items: Vec<Campaign>,
    /// Cursor for the next page. Logged, never followed.
    #[serde(default)]
    pub next_starting_after: Option<String>,
}

/// Inclusive date range sent to the analytics endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsWindow {
    /// First day.
    pub start: Date,
    /// Last day.
    pub end: Date,
}

impl AnalyticsWindow {
    /// The fixed reporting window.
    pub const DEFAULT: AnalyticsWindow = AnalyticsWindow {
        start: date!(2025-10-01),
        end: date!(2025-10-25),
    };

    /// `start_date` query value.
    pub fn start_param(&self) -> String {
        self.start.to_string()
    }

    /// `end_date` query value.
    pub fn end_param(&self) -> String {
        self.end.to_string()
    }
}

impl Default for AnalyticsWindow {
    fn default() -> Self {
        Self::DEFAULT
    }
}
