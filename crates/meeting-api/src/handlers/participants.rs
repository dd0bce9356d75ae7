//! Participant handlers.
//!
//! - `GET /participants`, `POST /participants`
//! - `GET|PATCH|DELETE /participants/:id`

use crate::errors::ApiError;
use crate::handlers::decode_body;
use crate::models::{CreateParticipantRequest, ParticipantResponse, UpdateParticipantRequest};
use crate::routes::AppState;
use crate::services::ParticipantService;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::instrument;

/// Handler for GET /participants
#[instrument(skip_all, name = "meeting_api.handlers.list_participants")]
pub async fn list_participants(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ParticipantResponse>>, ApiError> {
    Ok(Json(ParticipantService::list_all(&state.pool).await?))
}

/// Handler for GET /participants/:id
#[instrument(skip_all, name = "meeting_api.handlers.get_participant", fields(participant_id = %id))]
pub async fn get_participant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ParticipantResponse>, ApiError> {
    Ok(Json(ParticipantService::get_by_id(&state.pool, &id).await?))
}

/// Handler for POST /participants
///
/// - 201 Created: New participant (profile is null)
/// - 400 Bad Request: Missing name, season or phone
/// - 409 Conflict: Phone number already registered
#[instrument(skip_all, name = "meeting_api.handlers.create_participant")]
pub async fn create_participant(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<ParticipantResponse>), ApiError> {
    let request: CreateParticipantRequest = decode_body(&body)?;
    let participant = ParticipantService::create(&state.pool, request).await?;
    Ok((StatusCode::CREATED, Json(participant)))
}

/// Handler for PATCH /participants/:id
#[instrument(skip_all, name = "meeting_api.handlers.update_participant", fields(participant_id = %id))]
pub async fn update_participant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<ParticipantResponse>, ApiError> {
    let request: UpdateParticipantRequest = decode_body(&body)?;
    Ok(Json(
        ParticipantService::update(&state.pool, &id, request).await?,
    ))
}

/// Handler for DELETE /participants/:id
///
/// Also deletes the participant's profile and removes it from every meeting.
#[instrument(skip_all, name = "meeting_api.handlers.delete_participant", fields(participant_id = %id))]
pub async fn delete_participant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ParticipantService::delete(&state.pool, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
