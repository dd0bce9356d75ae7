//! Health check handlers.
//!
//! - `GET /health` - liveness, always 200 while the process is serving
//! - `GET /ready` - readiness, 200 only when the database answers

use crate::models::ReadinessResponse;
use crate::routes::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;
use tracing::instrument;

/// Liveness probe. Does not touch the database.
#[instrument(skip_all, name = "meeting_api.health.liveness")]
pub async fn health_check() -> &'static str {
    "OK"
}

/// Readiness probe.
///
/// Pings the database; returns 503 with `status: "not_ready"` when it is
/// unreachable.
///
/// ```json
/// { "status": "ready", "database": "healthy" }
/// ```
#[instrument(skip_all, name = "meeting_api.health.readiness")]
pub async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ReadinessResponse>) {
    match sqlx::query("SELECT 1").fetch_one(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(ReadinessResponse {
                status: "ready",
                database: Some("healthy"),
                error: None,
            }),
        ),
        Err(e) => {
            tracing::warn!(
                target: "meeting_api.health",
                error = %e,
                "Readiness check failed: database unreachable"
            );
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessResponse {
                    status: "not_ready",
                    database: Some("unhealthy"),
                    error: Some("Database connectivity check failed".to_string()),
                }),
            )
        }
    }
}
