//! Profile service.
//!
//! Profiles are addressed by their owning participant's id.

use crate::errors::ApiError;
use crate::models::{CreateProfileRequest, ProfileResponse, UpdateProfileRequest};
use crate::repositories::{ParticipantsRepository, ProfilesRepository};
use crate::services::{begin_write, timed};
use sqlx::SqlitePool;
use tracing::{info, instrument};
use uuid::Uuid;

const ENTITY: &str = "profile";

/// Service for profile operations.
pub struct ProfileService;

impl ProfileService {
    /// Create a profile for an existing participant.
    ///
    /// # Errors
    ///
    /// - `ApiError::Validation` - `participantId` missing or blank
    /// - `ApiError::NotFound` - Participant does not exist
    #[instrument(skip_all, name = "meeting_api.service.create_profile")]
    pub async fn create(
        pool: &SqlitePool,
        request: CreateProfileRequest,
    ) -> Result<ProfileResponse, ApiError> {
        timed(ENTITY, "create", async {
            let profile = request.validate()?;

            let mut tx = begin_write(pool).await?;

            if ParticipantsRepository::find_by_id(&mut *tx, &profile.participant_id)
                .await?
                .is_none()
            {
                return Err(ApiError::NotFound("Participant not found".to_string()));
            }

            let id = Uuid::new_v4().to_string();
            let row = ProfilesRepository::insert(
                &mut *tx,
                &id,
                &profile.participant_id,
                profile.image_url.as_deref(),
            )
            .await?;

            tx.commit().await?;

            info!(
                target: "meeting_api.service.profiles",
                profile_id = %id,
                participant_id = %profile.participant_id,
                "Profile created"
            );

            Ok(ProfileResponse::from(row))
        })
        .await
    }

    /// Get the profile owned by a participant.
    ///
    /// # Errors
    ///
    /// - `ApiError::NotFound` - Participant has no profile (or does not exist)
    #[instrument(skip_all, name = "meeting_api.service.get_profile", fields(participant_id = %participant_id))]
    pub async fn find_by_participant_id(
        pool: &SqlitePool,
        participant_id: &str,
    ) -> Result<ProfileResponse, ApiError> {
        timed(ENTITY, "get", async {
            let mut conn = pool.acquire().await?;
            let row = ProfilesRepository::find_by_participant_id(&mut *conn, participant_id)
                .await?
                .ok_or_else(profile_not_found)?;
            Ok(ProfileResponse::from(row))
        })
        .await
    }

    /// Update a participant's profile. Only a supplied `imageUrl` overwrites.
    ///
    /// # Errors
    ///
    /// - `ApiError::NotFound` - Participant has no profile
    #[instrument(skip_all, name = "meeting_api.service.update_profile", fields(participant_id = %participant_id))]
    pub async fn update(
        pool: &SqlitePool,
        participant_id: &str,
        request: UpdateProfileRequest,
    ) -> Result<ProfileResponse, ApiError> {
        timed(ENTITY, "update", async {
            let mut tx = begin_write(pool).await?;

            let mut row = ProfilesRepository::find_by_participant_id(&mut *tx, participant_id)
                .await?
                .ok_or_else(profile_not_found)?;

            if let Some(image_url) = request.image_url.into_value() {
                row = ProfilesRepository::update_image_url(&mut *tx, &row.id, Some(&image_url))
                    .await?;
            }

            tx.commit().await?;

            info!(
                target: "meeting_api.service.profiles",
                profile_id = %row.id,
                "Profile updated"
            );

            Ok(ProfileResponse::from(row))
        })
        .await
    }

    /// Delete a participant's profile. The participant is kept.
    ///
    /// # Errors
    ///
    /// - `ApiError::NotFound` - Participant has no profile
    #[instrument(skip_all, name = "meeting_api.service.delete_profile", fields(participant_id = %participant_id))]
    pub async fn delete(pool: &SqlitePool, participant_id: &str) -> Result<(), ApiError> {
        timed(ENTITY, "delete", async {
            let mut tx = begin_write(pool).await?;

            let row = ProfilesRepository::find_by_participant_id(&mut *tx, participant_id)
                .await?
                .ok_or_else(profile_not_found)?;
            ProfilesRepository::delete(&mut *tx, &row.id).await?;

            tx.commit().await?;

            info!(
                target: "meeting_api.service.profiles",
                profile_id = %row.id,
                "Profile deleted"
            );

            Ok(())
        })
        .await
    }
}

fn profile_not_found() -> ApiError {
    ApiError::NotFound("Profile not found".to_string())
}
