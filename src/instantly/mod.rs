//! Instantly campaign API module.
//!
//! This module handles:
//! - Campaign and analytics window types
//! - The `CampaignApi` seam and its reqwest client
//! - Mock client for testing

pub mod client;
pub mod mock;
pub mod types;

pub use client::{CampaignApi, InstantlyClient};
pub use mock::{MockConfig, MockInstantlyClient};
pub use types::{AnalyticsWindow, Campaign, CampaignList};
