//! HTTP API route definitions.

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers::{analytics, health, render_metrics, AppState};
use crate::instantly::CampaignApi;

/// Create the API router.
pub fn create_router<C: CampaignApi + 'static>(state: AppState<C>) -> Router {
    let mut router = Router::new()
        .route("/api/health", get(health::<C>))
        .route("/api/analytics", get(analytics::<C>));

    if state.metrics.is_some() {
        router = router.route("/metrics", get(render_metrics::<C>));
    }

    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
