//! HTTP routes for the Meeting API.
//!
//! Defines the Axum router and application state.

use crate::config::Config;
use crate::handlers;
use crate::middleware::http_metrics_middleware;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: SqlitePool,

    /// Service configuration.
    pub config: Config,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/health` - Liveness probe (plain "OK")
/// - `/ready` - Readiness probe (database ping)
/// - `/metrics` - Prometheus metrics endpoint
/// - `/meetings`, `/meetings/:id` - Meeting CRUD
/// - `/participants`, `/participants/:id` - Participant CRUD
/// - `/profiles`, `/profiles/participant/:participant_id` - Profile CRUD
/// - TraceLayer for request logging
/// - HTTP metrics middleware
/// - Request timeout from `REQUEST_TIMEOUT_SECONDS`
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let request_timeout = Duration::from_secs(state.config.request_timeout_seconds);

    let operational_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .with_state(state.clone());

    // Metrics route with its own state
    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    let api_routes = Router::new()
        .route(
            "/meetings",
            get(handlers::meetings::list_meetings).post(handlers::meetings::create_meeting),
        )
        .route(
            "/meetings/:id",
            get(handlers::meetings::get_meeting)
                .patch(handlers::meetings::update_meeting)
                .delete(handlers::meetings::delete_meeting),
        )
        .route(
            "/participants",
            get(handlers::participants::list_participants)
                .post(handlers::participants::create_participant),
        )
        .route(
            "/participants/:id",
            get(handlers::participants::get_participant)
                .patch(handlers::participants::update_participant)
                .delete(handlers::participants::delete_participant),
        )
        .route("/profiles", post(handlers::profiles::create_profile))
        .route(
            "/profiles/participant/:participant_id",
            get(handlers::profiles::get_profile)
                .patch(handlers::profiles::update_profile)
                .delete(handlers::profiles::delete_profile),
        )
        .with_state(state);

    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer - Timeout the request (innermost)
    // 2. TraceLayer - Log request details
    // 3. http_metrics_middleware - Record ALL responses (outermost)
    operational_routes
        .merge(metrics_routes)
        .merge(api_routes)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(http_metrics_middleware))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }
}
