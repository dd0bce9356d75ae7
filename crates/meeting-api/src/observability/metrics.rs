//! Metrics definitions for the Meeting API.
//!
//! All metrics follow Prometheus naming conventions:
//! - `meeting_api_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded:
//! - `method`: HTTP methods
//! - `endpoint`: parameterized paths (ids replaced by `{id}`)
//! - `status_code`: HTTP status codes returned by this service
//! - `status`: operation outcome (success, not_found, rejected, error)
//! - `entity` / `operation`: fixed by code

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize the Prometheus metrics recorder and return the handle used
/// to render `/metrics`.
///
/// # Errors
///
/// Returns error if the recorder fails to install (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("meeting_api_http_request".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.150, 0.200, 0.300, 0.500, 1.000, 2.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        .set_buckets_for_metric(
            Matcher::Prefix("meeting_api_operation".to_string()),
            &[
                0.001, 0.002, 0.005, 0.010, 0.020, 0.050, 0.100, 0.250, 0.500, 1.000,
            ],
        )
        .map_err(|e| format!("Failed to set operation buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

// ============================================================================
// HTTP Request Metrics
// ============================================================================

/// Record HTTP request completion
///
/// Metric: `meeting_api_http_requests_total`,
/// `meeting_api_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status_code` (same set on both)
pub fn record_http_request(method: &str, endpoint: &str, status_code: u16, duration: Duration) {
    let normalized_endpoint = normalize_endpoint(endpoint);
    let status_code = status_code.to_string();

    histogram!("meeting_api_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint.clone(),
        "status_code" => status_code.clone()
    )
    .record(duration.as_secs_f64());

    counter!("meeting_api_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status_code" => status_code
    )
    .increment(1);
}

/// Normalize a request path so resource ids do not become label values.
///
/// `/meetings/3f2a...` becomes `/meetings/{id}` and
/// `/profiles/participant/3f2a...` becomes `/profiles/participant/{id}`.
/// Unknown paths collapse to `/other`.
pub fn normalize_endpoint(path: &str) -> String {
    let segments: Vec<&str> = path.trim_end_matches('/').split('/').skip(1).collect();

    match segments.as_slice() {
        [] | [""] => "/".to_string(),
        ["health"] | ["ready"] | ["metrics"] | ["meetings"] | ["participants"] | ["profiles"] => {
            path.trim_end_matches('/').to_string()
        }
        ["meetings", _] => "/meetings/{id}".to_string(),
        ["participants", _] => "/participants/{id}".to_string(),
        ["profiles", "participant", _] => "/profiles/participant/{id}".to_string(),
        _ => "/other".to_string(),
    }
}

// ============================================================================
// Service Operation Metrics
// ============================================================================

/// Record completion of a service-layer operation.
///
/// Metric: `meeting_api_operations_total`,
/// `meeting_api_operation_duration_seconds`
/// Labels: `entity`, `operation`, `status`
pub fn record_operation(
    entity: &'static str,
    operation: &'static str,
    status: &'static str,
    duration: Duration,
) {
    histogram!("meeting_api_operation_duration_seconds",
        "entity" => entity,
        "operation" => operation,
        "status" => status
    )
    .record(duration.as_secs_f64());

    counter!("meeting_api_operations_total",
        "entity" => entity,
        "operation" => operation,
        "status" => status
    )
    .increment(1);
}
