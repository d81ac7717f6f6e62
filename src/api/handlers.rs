//! HTTP API handlers.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::analytics::{aggregate_campaign_analytics, MOCK_ANALYTICS_JSON};
use crate::config::{Config, CAMPAIGN_LIMIT};
use crate::error::UpstreamError;
use crate::instantly::{AnalyticsWindow, CampaignApi};
use crate::metrics;

/// Application state shared with handlers.
pub struct AppState<C> {
    /// Configuration read once at startup.
    pub config: Arc<Config>,
    /// Instantly API client.
    pub client: Arc<C>,
    /// Prometheus handle when metrics are enabled.
    pub metrics: Option<PrometheusHandle>,
}

impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            client: Arc::clone(&self.client),
            metrics: self.metrics.clone(),
        }
    }
}

impl<C> AppState<C> {
    /// Create new app state.
    pub fn new(config: Config, client: C) -> Self {
        Self {
            config: Arc::new(config),
            client: Arc::new(client),
            metrics: None,
        }
    }

    /// Attach a Prometheus handle, enabling `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always true.
    pub ok: bool,
    /// Whether mock mode is active.
    #[serde(rename = "useMock")]
    pub use_mock: bool,
}

/// Error body for failed analytics requests.
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Generic message.
    pub error: &'static str,
    /// Upstream payload or local error message.
    pub details: Value,
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        Self {
            error: "Failed to fetch analytics",
            details: err.details(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}

/// Health check handler - always returns 200.
pub async fn health<C>(State(state): State<AppState<C>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        use_mock: state.config.use_mock,
    })
}

/// Analytics handler - mock dataset or live aggregation.
pub async fn analytics<C: CampaignApi>(
    State(state): State<AppState<C>>,
) -> Result<Response, ApiError> {
    metrics::inc_analytics_requests(state.config.data_source());

    if state.config.use_mock {
        debug!("Serving mock analytics");
        return Ok((
            [(header::CONTENT_TYPE, "application/json")],
            MOCK_ANALYTICS_JSON,
        )
            .into_response());
    }

    let window = AnalyticsWindow::DEFAULT;
    let results = aggregate_campaign_analytics(state.client.as_ref(), CAMPAIGN_LIMIT, &window)
        .await
        .inspect_err(|err| {
            error!(error = %err, "Failed to fetch analytics");
            metrics::inc_analytics_failures();
        })?;

    Ok(Json(results).into_response())
}

/// Prometheus exposition handler.
pub async fn render_metrics<C>(State(state): State<AppState<C>>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
