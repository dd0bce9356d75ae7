//! Profile handlers.
//!
//! Profiles are created with `POST /profiles` and afterwards addressed by
//! the owning participant: `GET|PATCH|DELETE /profiles/participant/:participant_id`.

use crate::errors::ApiError;
use crate::handlers::decode_body;
use crate::models::{CreateProfileRequest, ProfileResponse, UpdateProfileRequest};
use crate::routes::AppState;
use crate::services::ProfileService;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::instrument;

/// Handler for POST /profiles
///
/// - 201 Created: New profile
/// - 400 Bad Request: Missing participantId
/// - 404 Not Found: Participant does not exist
#[instrument(skip_all, name = "meeting_api.handlers.create_profile")]
pub async fn create_profile(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<ProfileResponse>), ApiError> {
    let request: CreateProfileRequest = decode_body(&body)?;
    let profile = ProfileService::create(&state.pool, request).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Handler for GET /profiles/participant/:participant_id
#[instrument(skip_all, name = "meeting_api.handlers.get_profile", fields(participant_id = %participant_id))]
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(participant_id): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    Ok(Json(
        ProfileService::find_by_participant_id(&state.pool, &participant_id).await?,
    ))
}

/// Handler for PATCH /profiles/participant/:participant_id
#[instrument(skip_all, name = "meeting_api.handlers.update_profile", fields(participant_id = %participant_id))]
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Path(participant_id): Path<String>,
    body: Bytes,
) -> Result<Json<ProfileResponse>, ApiError> {
    let request: UpdateProfileRequest = decode_body(&body)?;
    Ok(Json(
        ProfileService::update(&state.pool, &participant_id, request).await?,
    ))
}

/// Handler for DELETE /profiles/participant/:participant_id
#[instrument(skip_all, name = "meeting_api.handlers.delete_profile", fields(participant_id = %participant_id))]
pub async fn delete_profile(
    State(state): State<Arc<AppState>>,
    Path(participant_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ProfileService::delete(&state.pool, &participant_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
