//! Meeting handlers.
//!
//! - `GET /meetings` - list, most recently modified first
//! - `POST /meetings` - create
//! - `GET /meetings/:id` - fetch one
//! - `PATCH /meetings/:id` - partial update
//! - `DELETE /meetings/:id` - delete (participants are kept)

use crate::errors::ApiError;
use crate::handlers::decode_body;
use crate::models::{CreateMeetingRequest, MeetingResponse, UpdateMeetingRequest};
use crate::routes::AppState;
use crate::services::MeetingService;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::instrument;

/// Handler for GET /meetings
#[instrument(skip_all, name = "meeting_api.handlers.list_meetings")]
pub async fn list_meetings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MeetingResponse>>, ApiError> {
    Ok(Json(MeetingService::list_all(&state.pool).await?))
}

/// Handler for GET /meetings/:id
///
/// - 200 OK: Meeting with participants
/// - 404 Not Found: Unknown id
#[instrument(skip_all, name = "meeting_api.handlers.get_meeting", fields(meeting_id = %id))]
pub async fn get_meeting(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MeetingResponse>, ApiError> {
    Ok(Json(MeetingService::get_by_id(&state.pool, &id).await?))
}

/// Handler for POST /meetings
///
/// # Request Body
///
/// ```json
/// {
///   "title": "Weekly sync",
///   "desc": "Season kickoff",
///   "date": "2026-01-15T12:00:00",
///   "location": "Room 3",
///   "participantIds": ["..."]
/// }
/// ```
///
/// # Response
///
/// - 201 Created: Meeting with the participants that resolved
/// - 400 Bad Request: Missing fields, bad JSON or bad date
#[instrument(skip_all, name = "meeting_api.handlers.create_meeting")]
pub async fn create_meeting(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<MeetingResponse>), ApiError> {
    let request: CreateMeetingRequest = decode_body(&body)?;
    let meeting = MeetingService::create(&state.pool, request).await?;
    Ok((StatusCode::CREATED, Json(meeting)))
}

/// Handler for PATCH /meetings/:id
///
/// - 200 OK: Updated meeting
/// - 400 Bad Request: Bad JSON or bad date
/// - 404 Not Found: Unknown id
#[instrument(skip_all, name = "meeting_api.handlers.update_meeting", fields(meeting_id = %id))]
pub async fn update_meeting(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<MeetingResponse>, ApiError> {
    let request: UpdateMeetingRequest = decode_body(&body)?;
    Ok(Json(MeetingService::update(&state.pool, &id, request).await?))
}

/// Handler for DELETE /meetings/:id
///
/// - 204 No Content: Deleted
/// - 404 Not Found: Unknown id
#[instrument(skip_all, name = "meeting_api.handlers.delete_meeting", fields(meeting_id = %id))]
pub async fn delete_meeting(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    MeetingService::delete(&state.pool, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
