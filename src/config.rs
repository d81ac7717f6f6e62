//! Application configuration loaded from environment variables.

use serde::{Deserialize, Deserializer};
use strum::Display;

/// Instantly v2 API base URL.
pub const INSTANTLY_BASE_URL: &str = "https://api.instantly.ai/api/v2";

/// Number of campaigns requested from the list endpoint.
pub const CAMPAIGN_LIMIT: u32 = 2;

/// HTTP listening port.
pub const PORT: u16 = 4000;

/// Where analytics responses come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DataSource {
    /// Fixed sample data, no outbound calls.
    #[strum(serialize = "mock")]
    Mock,
    /// Live calls to the Instantly API.
    #[strum(serialize = "live")]
    Live,
}

/// Application configuration loaded from environment variables.
///
/// Built once at startup and shared read-only with the HTTP handlers.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Bearer credential for the Instantly API.
    #[serde(default)]
    pub instantly_api_key: Option<String>,

    /// Serve fixed sample data. Only the literal `true` enables it.
    #[serde(default, deserialize_with = "literal_true")]
    pub use_mock: bool,

    /// Log filter used when `--verbose` is not given.
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Install the Prometheus recorder and expose `/metrics`.
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn literal_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref() == Some("true"))
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            instantly_api_key: None,
            use_mock: false,
            rust_log: default_log_level(),
            metrics_enabled: default_true(),
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.use_mock {
            return Ok(());
        }

        match self.instantly_api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(()),
            _ => Err("INSTANTLY_API_KEY is required unless USE_MOCK=true".to_string()),
        }
    }

    /// Current data source.
    pub fn data_source(&self) -> DataSource {
        if self.use_mock {
            DataSource::Mock
        } else {
            DataSource::Live
        }
    }

    /// API key, or an empty string in mock mode where it is never sent.
    pub fn api_key(&self) -> &str {
        self.instantly_api_key.as_deref().unwrap_or_default()
    }
}
