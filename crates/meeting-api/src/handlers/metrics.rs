//! Prometheus metrics endpoint handler.

use axum::{extract::State, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

/// Handler for GET /metrics
///
/// Returns Prometheus text exposition:
/// ```text
/// # TYPE meeting_api_http_requests_total counter
/// meeting_api_http_requests_total{method="GET",endpoint="/meetings",status_code="200"} 42
/// ```
#[tracing::instrument(skip_all, name = "meeting_api.metrics.scrape")]
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    handle.render()
}
