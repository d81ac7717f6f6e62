//! Campaign analytics proxy for the Instantly v2 API.
//!
//! Exposes a health check and an analytics endpoint. The analytics endpoint
//! lists a fixed number of campaigns, fetches daily and overview analytics
//! for each of them concurrently, and returns one merged record per
//! campaign in list order. With `USE_MOCK=true` it serves a fixed sample
//! dataset instead.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`instantly`]: Instantly API client and its mock
//! - [`analytics`]: Per-campaign fan-out and the mock dataset
//! - [`api`]: HTTP routes and handlers
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod analytics;
pub mod api;
pub mod config;
pub mod error;
pub mod instantly;
pub mod metrics;
pub mod utils;

pub use config::Config;
pub use error::{ProxyError, Result};
