//! Participant service.
//!
//! Phone numbers are unique among participants; creation checks this up
//! front so a clash is reported as a duplicate rather than a storage error.
//! Deleting a participant also removes its profile and unlinks it from every
//! meeting.

use crate::errors::ApiError;
use crate::models::{CreateParticipantRequest, ParticipantResponse, UpdateParticipantRequest};
use crate::repositories::{MeetingParticipantsRepository, ParticipantsRepository, ProfilesRepository};
use crate::services::{begin_write, timed};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

const ENTITY: &str = "participant";

/// Service for participant operations.
pub struct ParticipantService;

impl ParticipantService {
    /// List every participant with its profile.
    #[instrument(skip_all, name = "meeting_api.service.list_participants")]
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<ParticipantResponse>, ApiError> {
        timed(ENTITY, "list", async {
            let mut conn = pool.acquire().await?;
            let rows = ParticipantsRepository::list_all(&mut *conn).await?;
            Ok(rows.into_iter().map(ParticipantResponse::from).collect())
        })
        .await
    }

    /// Get one participant.
    ///
    /// # Errors
    ///
    /// - `ApiError::NotFound` - No participant with this id
    #[instrument(skip_all, name = "meeting_api.service.get_participant", fields(participant_id = %id))]
    pub async fn get_by_id(pool: &SqlitePool, id: &str) -> Result<ParticipantResponse, ApiError> {
        timed(ENTITY, "get", async {
            let mut conn = pool.acquire().await?;
            let row = ParticipantsRepository::find_by_id(&mut *conn, id)
                .await?
                .ok_or_else(participant_not_found)?;
            Ok(ParticipantResponse::from(row))
        })
        .await
    }

    /// Register a participant.
    ///
    /// # Errors
    ///
    /// - `ApiError::Validation` - Required fields missing or blank
    /// - `ApiError::Duplicate` - Phone number already registered
    #[instrument(skip_all, name = "meeting_api.service.create_participant")]
    pub async fn create(
        pool: &SqlitePool,
        request: CreateParticipantRequest,
    ) -> Result<ParticipantResponse, ApiError> {
        timed(ENTITY, "create", async {
            let participant = request.validate()?;

            let mut tx = begin_write(pool).await?;

            if let Some(existing) =
                ParticipantsRepository::find_by_phone(&mut *tx, &participant.phone).await?
            {
                warn!(
                    target: "meeting_api.service.participants",
                    existing_participant_id = %existing.id,
                    "Rejected participant with registered phone number"
                );
                return Err(ApiError::Duplicate(
                    "Phone number is already registered".to_string(),
                ));
            }

            let id = Uuid::new_v4().to_string();
            let row =
                ParticipantsRepository::insert(&mut *tx, &id, &participant, Utc::now().naive_utc())
                    .await?;

            tx.commit().await?;

            info!(
                target: "meeting_api.service.participants",
                participant_id = %id,
                "Participant created"
            );

            Ok(ParticipantResponse::from(row))
        })
        .await
    }

    /// Apply a partial update. Only fields carrying a value are overwritten.
    ///
    /// The phone number is not re-checked for uniqueness here; the storage
    /// constraint rejects a clash.
    ///
    /// # Errors
    ///
    /// - `ApiError::NotFound` - No participant with this id
    #[instrument(skip_all, name = "meeting_api.service.update_participant", fields(participant_id = %id))]
    pub async fn update(
        pool: &SqlitePool,
        id: &str,
        request: UpdateParticipantRequest,
    ) -> Result<ParticipantResponse, ApiError> {
        timed(ENTITY, "update", async {
            let mut tx = begin_write(pool).await?;

            let mut participant = ParticipantsRepository::find_by_id(&mut *tx, id)
                .await?
                .ok_or_else(participant_not_found)?;

            if let Some(name) = request.name.into_value() {
                participant.name = name;
            }
            if let Some(season) = request.season.into_value() {
                participant.season = season;
            }
            if let Some(phone) = request.phone.into_value() {
                participant.phone = phone;
            }

            let row =
                ParticipantsRepository::update(&mut *tx, &participant, Utc::now().naive_utc())
                    .await?;

            tx.commit().await?;

            info!(
                target: "meeting_api.service.participants",
                participant_id = %id,
                "Participant updated"
            );

            Ok(ParticipantResponse::from(row))
        })
        .await
    }

    /// Delete a participant together with its profile, unlinking it from
    /// every meeting first. The meetings themselves are left in place.
    ///
    /// # Errors
    ///
    /// - `ApiError::NotFound` - No participant with this id
    #[instrument(skip_all, name = "meeting_api.service.delete_participant", fields(participant_id = %id))]
    pub async fn delete(pool: &SqlitePool, id: &str) -> Result<(), ApiError> {
        timed(ENTITY, "delete", async {
            let mut tx = begin_write(pool).await?;

            if ParticipantsRepository::find_by_id(&mut *tx, id).await?.is_none() {
                return Err(participant_not_found());
            }

            let meetings_left =
                MeetingParticipantsRepository::detach_participant(&mut *tx, id).await?;
            let profiles_removed = ProfilesRepository::delete_by_participant_id(&mut *tx, id).await?;
            ParticipantsRepository::delete(&mut *tx, id).await?;

            tx.commit().await?;

            info!(
                target: "meeting_api.service.participants",
                participant_id = %id,
                meetings_left,
                profiles_removed,
                "Participant deleted"
            );

            Ok(())
        })
        .await
    }
}

fn participant_not_found() -> ApiError {
    ApiError::NotFound("Participant not found".to_string())
}
