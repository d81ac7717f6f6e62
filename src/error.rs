//! Unified error types for the analytics proxy.

use reqwest::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;

/// Unified error type for the analytics proxy.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but not usable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Instantly API error.
    #[error("upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// HTTP client construction error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Prometheus recorder installation error.
    #[error("metrics error: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures talking to the Instantly API.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// The campaign list came back without any campaigns.
    #[error("no campaigns found")]
    Empty,

    /// The request never produced a response.
    #[error("request to {endpoint} failed: {source}")]
    Request {
        /// Upstream endpoint path.
        endpoint: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}")]
    Status {
        /// Upstream endpoint path.
        endpoint: String,
        /// Response status.
        status: StatusCode,
        /// Response payload, parsed as JSON when possible.
        body: Value,
    },

    /// The response body could not be decoded.
    #[error("failed to decode {endpoint} response: {reason}")]
    Decode {
        /// Upstream endpoint path.
        endpoint: String,
        /// Decoder message.
        reason: String,
    },
}

impl UpstreamError {
    /// Detail payload reported to callers.
    ///
    /// The upstream's own error body when there is one, otherwise the
    /// local error message.
    pub fn details(&self) -> Value {
        match self {
            UpstreamError::Status { body, .. } if !body.is_null() => body.clone(),
            other => json!({ "message": other.to_string() }),
        }
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ProxyError>;
