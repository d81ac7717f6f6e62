//! Prometheus metrics for upstream latency and request outcomes.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

use crate::config::DataSource;

// === Metric Name Constants ===

/// Instantly API call latency metric name.
pub const METRIC_UPSTREAM_LATENCY: &str = "upstream_request_latency_ms";
/// Failed Instantly API calls counter metric name.
pub const METRIC_UPSTREAM_FAILURES: &str = "upstream_failures_total";
/// Analytics requests counter metric name.
pub const METRIC_ANALYTICS_REQUESTS: &str = "analytics_requests_total";
/// Failed analytics requests counter metric name.
pub const METRIC_ANALYTICS_FAILURES: &str = "analytics_failures_total";
/// Campaigns returned per analytics request metric name.
pub const METRIC_CAMPAIGNS_AGGREGATED: &str = "campaigns_aggregated";

/// Install the global Prometheus recorder and describe all metrics.
///
/// Call once at startup. The returned handle renders the `/metrics` body.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Initialize all metric descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_UPSTREAM_LATENCY,
        "Instantly API request latency in milliseconds"
    );
    describe_histogram!(
        METRIC_CAMPAIGNS_AGGREGATED,
        "Number of campaigns merged into one analytics response"
    );

    describe_counter!(
        METRIC_UPSTREAM_FAILURES,
        "Total number of failed Instantly API requests"
    );
    describe_counter!(
        METRIC_ANALYTICS_REQUESTS,
        "Total number of analytics requests served"
    );
    describe_counter!(
        METRIC_ANALYTICS_FAILURES,
        "Total number of analytics requests that failed"
    );

    debug!("Metrics initialized");
}

/// Record Instantly API latency.
pub fn record_upstream_latency(start: Instant, endpoint: &'static str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_UPSTREAM_LATENCY, "endpoint" => endpoint).record(latency_ms);
}

/// Increment upstream failures counter.
pub fn inc_upstream_failures(endpoint: &'static str) {
    counter!(METRIC_UPSTREAM_FAILURES, "endpoint" => endpoint).increment(1);
}

/// Increment analytics requests counter.
pub fn inc_analytics_requests(source: DataSource) {
    counter!(METRIC_ANALYTICS_REQUESTS, "source" => source.to_string()).increment(1);
}

/// Increment analytics failures counter.
pub fn inc_analytics_failures() {
    counter!(METRIC_ANALYTICS_FAILURES).increment(1);
}

/// Record how many campaigns one response carried.
pub fn record_campaigns_aggregated(count: usize) {
    histogram!(METRIC_CAMPAIGNS_AGGREGATED).record(count as f64);
}

/// RAII guard for timing one upstream call.
/// Records latency when dropped, whatever the outcome.
pub struct UpstreamTimer {
    start: Instant,
    endpoint: &'static str,
}

impl UpstreamTimer {
    /// Start timing a call to `endpoint`.
    pub fn new(endpoint: &'static str) -> Self {
        Self {
            start: Instant::now(),
            endpoint,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for UpstreamTimer {
    fn drop(&mut self) {
        record_upstream_latency(self.start, self.endpoint);
    }
}
