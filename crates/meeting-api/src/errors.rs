//! Meeting API error types.
//!
//! All errors map to HTTP status codes via the `IntoResponse` impl.
//! Storage and internal failures are logged server-side and returned to
//! clients with a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{NaiveDateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Generic message returned for validation failures.
pub const VALIDATION_FAILED_MESSAGE: &str = "Input validation failed";

/// Generic message returned for storage and internal failures.
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred";

/// Meeting API error type.
///
/// Maps to HTTP status codes:
/// - NotFound: 404 Not Found
/// - Duplicate: 409 Conflict
/// - Validation, BadRequest: 400 Bad Request
/// - Database, Internal: 500 Internal Server Error
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate resource: {0}")]
    Duplicate(String),

    /// Per-field messages keyed by the wire field name.
    #[error("Validation failed: {0:?}")]
    Validation(BTreeMap<String, String>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Duplicate(_) => StatusCode::CONFLICT,
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Uniform error body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub timestamp: NaiveDateTime,
    pub status: u16,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<BTreeMap<String, String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (message, validation_errors) = match self {
            ApiError::NotFound(message) => {
                tracing::debug!(target: "meeting_api.errors", %message, "Resource not found");
                (message, None)
            }
            ApiError::Duplicate(message) => {
                tracing::warn!(target: "meeting_api.errors", %message, "Duplicate resource");
                (message, None)
            }
            ApiError::Validation(fields) => {
                tracing::debug!(target: "meeting_api.errors", fields = ?fields, "Validation failed");
                (VALIDATION_FAILED_MESSAGE.to_string(), Some(fields))
            }
            ApiError::BadRequest(message) => (message, None),
            ApiError::Database(err) => {
                // Log actual error server-side, return generic message to client
                tracing::error!(target: "meeting_api.database", error = %err, "Database operation failed");
                (INTERNAL_ERROR_MESSAGE.to_string(), None)
            }
            ApiError::Internal(err) => {
                tracing::error!(target: "meeting_api.internal", error = %err, "Internal error");
                (INTERNAL_ERROR_MESSAGE.to_string(), None)
            }
        };

        let body = ErrorResponse {
            timestamp: Utc::now().naive_utc(),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Unknown").to_string(),
            message,
            validation_errors,
        };

        (status, Json(body)).into_response()
    }
}

/// Convert sqlx errors to ApiError
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Database(err.to_string())
    }
}
