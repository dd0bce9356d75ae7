//! HTTP request handlers for the Meeting API.

pub mod health;
pub mod meetings;
pub mod metrics;
pub mod participants;
pub mod profiles;

pub use health::{health_check, readiness_check};
pub use metrics::metrics_handler;

use crate::errors::ApiError;
use axum::body::Bytes;
use serde::de::DeserializeOwned;

/// Decode a JSON request body.
///
/// Undecodable input is a 400 rather than axum's default 422.
pub(crate) fn decode_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(target: "meeting_api.handlers", error = %e, "Rejected request body");
        ApiError::BadRequest("Invalid request body".to_string())
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::{CreateParticipantRequest, UpdateMeetingRequest};

    #[test]
    fn test_decode_body_accepts_json() {
        let body = Bytes::from_static(br#"{"name":"Kim","season":"S1"}"#);
        let request: CreateParticipantRequest = decode_body(&body).unwrap();
        assert_eq!(request.name.as_deref(), Some("Kim"));
        assert!(request.phone.is_none());
    }

    #[test]
    fn test_decode_body_rejects_malformed_json() {
        let body = Bytes::from_static(b"{not json");
        let result: Result<UpdateMeetingRequest, _> = decode_body(&body);
        assert!(matches!(result, Err(ApiError::BadRequest(m)) if m == "Invalid request body"));
    }

    #[test]
    fn test_decode_body_rejects_wrong_types() {
        let body = Bytes::from_static(br#"{"participantIds":"not-a-list"}"#);
        let result: Result<UpdateMeetingRequest, _> = decode_body(&body);
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }
}
