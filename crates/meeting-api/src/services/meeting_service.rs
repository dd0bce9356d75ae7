//! Meeting service.
//!
//! A meeting's participant set lives in the association table. Create and
//! update resolve the requested ids against existing participants first;
//! ids that do not resolve are dropped without error.

use crate::errors::ApiError;
use crate::models::{
    parse_meeting_date, CreateMeetingRequest, MeetingResponse, ParticipantRow, UpdateMeetingRequest,
};
use crate::repositories::{MeetingParticipantsRepository, MeetingsRepository, ParticipantsRepository};
use crate::services::{begin_write, timed};
use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{info, instrument};
use uuid::Uuid;

const ENTITY: &str = "meeting";

/// Service for meeting operations.
pub struct MeetingService;

impl MeetingService {
    /// List every meeting with its participants, most recently modified first.
    #[instrument(skip_all, name = "meeting_api.service.list_meetings")]
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<MeetingResponse>, ApiError> {
        timed(ENTITY, "list", async {
            let mut conn = pool.acquire().await?;

            let meetings = MeetingsRepository::list_ordered_by_updated_at(&mut *conn).await?;
            let mut participants =
                MeetingParticipantsRepository::participants_by_meeting(&mut *conn).await?;

            Ok(meetings
                .into_iter()
                .map(|meeting| {
                    let members = participants.remove(&meeting.id).unwrap_or_default();
                    MeetingResponse::from_parts(meeting, members)
                })
                .collect())
        })
        .await
    }

    /// Get one meeting with its participants.
    ///
    /// # Errors
    ///
    /// - `ApiError::NotFound` - No meeting with this id
    #[instrument(skip_all, name = "meeting_api.service.get_meeting", fields(meeting_id = %id))]
    pub async fn get_by_id(pool: &SqlitePool, id: &str) -> Result<MeetingResponse, ApiError> {
        timed(ENTITY, "get", async {
            let mut conn = pool.acquire().await?;

            let meeting = MeetingsRepository::find_by_id(&mut *conn, id)
                .await?
                .ok_or_else(meeting_not_found)?;
            let participants = MeetingParticipantsRepository::participants_of(&mut *conn, id).await?;

            Ok(MeetingResponse::from_parts(meeting, participants))
        })
        .await
    }

    /// Create a meeting and link the requested participants.
    ///
    /// # Errors
    ///
    /// - `ApiError::Validation` - Required fields missing or blank
    /// - `ApiError::BadRequest` - Date cannot be parsed
    #[instrument(skip_all, name = "meeting_api.service.create_meeting")]
    pub async fn create(
        pool: &SqlitePool,
        request: CreateMeetingRequest,
    ) -> Result<MeetingResponse, ApiError> {
        timed(ENTITY, "create", async {
            let meeting = request.validate()?;
            let id = Uuid::new_v4().to_string();
            let now = Utc::now().naive_utc();

            let mut tx = begin_write(pool).await?;

            let participants =
                ParticipantsRepository::find_all_by_ids(&mut *tx, &meeting.participant_ids).await?;
            let row = MeetingsRepository::insert(&mut *tx, &id, &meeting, now).await?;
            link_participants(&mut *tx, &id, &participants).await?;

            tx.commit().await?;

            info!(
                target: "meeting_api.service.meetings",
                meeting_id = %id,
                requested = meeting.participant_ids.len(),
                linked = participants.len(),
                "Meeting created"
            );

            Ok(MeetingResponse::from_parts(row, participants))
        })
        .await
    }

    /// Apply a partial update.
    ///
    /// Only fields carrying a value are overwritten. A supplied
    /// `participantIds` (even an empty list) replaces the whole set.
    ///
    /// # Errors
    ///
    /// - `ApiError::NotFound` - No meeting with this id
    /// - `ApiError::BadRequest` - Date cannot be parsed
    #[instrument(skip_all, name = "meeting_api.service.update_meeting", fields(meeting_id = %id))]
    pub async fn update(
        pool: &SqlitePool,
        id: &str,
        request: UpdateMeetingRequest,
    ) -> Result<MeetingResponse, ApiError> {
        timed(ENTITY, "update", async {
            let mut tx = begin_write(pool).await?;

            let mut meeting = MeetingsRepository::find_by_id(&mut *tx, id)
                .await?
                .ok_or_else(meeting_not_found)?;

            if let Some(title) = request.title.into_value() {
                meeting.title = title;
            }
            if let Some(desc) = request.desc.into_value() {
                meeting.desc = desc;
            }
            if let Some(date) = request.date.into_value() {
                meeting.date = parse_meeting_date(&date)?;
            }
            if let Some(location) = request.location.into_value() {
                meeting.location = location;
            }

            let replaced_participants = request.participant_ids.is_value();
            if let Some(participant_ids) = request.participant_ids.into_value() {
                let participants =
                    ParticipantsRepository::find_all_by_ids(&mut *tx, &participant_ids).await?;
                link_participants(&mut *tx, id, &participants).await?;
            }

            let row = MeetingsRepository::update(&mut *tx, &meeting, Utc::now().naive_utc()).await?;
            let participants = MeetingParticipantsRepository::participants_of(&mut *tx, id).await?;

            tx.commit().await?;

            info!(
                target: "meeting_api.service.meetings",
                meeting_id = %id,
                replaced_participants,
                "Meeting updated"
            );

            Ok(MeetingResponse::from_parts(row, participants))
        })
        .await
    }

    /// Delete a meeting. Its participants are unlinked, never deleted.
    ///
    /// # Errors
    ///
    /// - `ApiError::NotFound` - No meeting with this id
    #[instrument(skip_all, name = "meeting_api.service.delete_meeting", fields(meeting_id = %id))]
    pub async fn delete(pool: &SqlitePool, id: &str) -> Result<(), ApiError> {
        timed(ENTITY, "delete", async {
            let mut tx = begin_write(pool).await?;

            if MeetingsRepository::find_by_id(&mut *tx, id).await?.is_none() {
                return Err(meeting_not_found());
            }

            let unlinked = MeetingParticipantsRepository::detach_meeting(&mut *tx, id).await?;
            MeetingsRepository::delete(&mut *tx, id).await?;

            tx.commit().await?;

            info!(
                target: "meeting_api.service.meetings",
                meeting_id = %id,
                unlinked,
                "Meeting deleted"
            );

            Ok(())
        })
        .await
    }
}

async fn link_participants(
    conn: &mut SqliteConnection,
    meeting_id: &str,
    participants: &[ParticipantRow],
) -> Result<(), ApiError> {
    let ids: Vec<&str> = participants.iter().map(|p| p.id.as_str()).collect();
    MeetingParticipantsRepository::replace_for_meeting(conn, meeting_id, &ids).await
}

fn meeting_not_found() -> ApiError {
    ApiError::NotFound("Meeting not found".to_string())
}
