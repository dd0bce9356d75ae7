//! Meeting/participant association repository.
//!
//! The `meeting_participants` table is the single source of truth for
//! membership in both directions. A participant's meetings are never stored
//! on the participant; they are recovered from this table at query time.

use crate::errors::ApiError;
use crate::models::ParticipantRow;
use crate::repositories::participants::PARTICIPANT_COLUMNS;
use sqlx::SqliteConnection;
use std::collections::HashMap;
use tracing::instrument;

/// A participant row tagged with the meeting it belongs to.
#[derive(Debug, sqlx::FromRow)]
struct MembershipRow {
    meeting_id: String,
    #[sqlx(flatten)]
    participant: ParticipantRow,
}

/// Repository for meeting membership.
pub struct MeetingParticipantsRepository;

impl MeetingParticipantsRepository {
    /// Participants of one meeting, with their profiles.
    #[instrument(skip_all, name = "meeting_api.repo.meeting_participants", fields(meeting_id = %meeting_id))]
    pub async fn participants_of(
        conn: &mut SqliteConnection,
        meeting_id: &str,
    ) -> Result<Vec<ParticipantRow>, ApiError> {
        let sql = format!(
            r#"
            SELECT {PARTICIPANT_COLUMNS}
            FROM meeting_participants mp
            JOIN participants p ON p.id = mp.participant_id
            LEFT JOIN profiles pr ON pr.participant_id = p.id
            WHERE mp.meeting_id = ?
            ORDER BY p.created_at, p.id
            "#
        );

        let rows = sqlx::query_as::<_, ParticipantRow>(&sql)
            .bind(meeting_id)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| {
                ApiError::Database(format!("Failed to fetch meeting participants: {}", e))
            })?;

        Ok(rows)
    }

    /// Participants of every meeting, keyed by meeting id.
    ///
    /// Meetings without participants have no entry.
    #[instrument(skip_all, name = "meeting_api.repo.all_meeting_participants")]
    pub async fn participants_by_meeting(
        conn: &mut SqliteConnection,
    ) -> Result<HashMap<String, Vec<ParticipantRow>>, ApiError> {
        let sql = format!(
            r#"
            SELECT mp.meeting_id, {PARTICIPANT_COLUMNS}
            FROM meeting_participants mp
            JOIN participants p ON p.id = mp.participant_id
            LEFT JOIN profiles pr ON pr.participant_id = p.id
            ORDER BY p.created_at, p.id
            "#
        );

        let rows = sqlx::query_as::<_, MembershipRow>(&sql)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| {
                ApiError::Database(format!("Failed to fetch meeting participants: {}", e))
            })?;

        let mut grouped: HashMap<String, Vec<ParticipantRow>> = HashMap::new();
        for row in rows {
            grouped
                .entry(row.meeting_id)
                .or_default()
                .push(row.participant);
        }

        Ok(grouped)
    }

    /// Replace a meeting's participant set with exactly `participant_ids`.
    ///
    /// Clears the existing links first, so an empty slice leaves the meeting
    /// with no participants. Callers pass ids that are known to exist.
    #[instrument(skip_all, name = "meeting_api.repo.replace_meeting_participants", fields(meeting_id = %meeting_id, count = participant_ids.len()))]
    pub async fn replace_for_meeting(
        conn: &mut SqliteConnection,
        meeting_id: &str,
        participant_ids: &[&str],
    ) -> Result<(), ApiError> {
        Self::detach_meeting(conn, meeting_id).await?;

        for participant_id in participant_ids {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO meeting_participants (meeting_id, participant_id)
                VALUES (?, ?)
                "#,
            )
            .bind(meeting_id)
            .bind(*participant_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                ApiError::Database(format!("Failed to link meeting participant: {}", e))
            })?;
        }

        Ok(())
    }

    /// Remove every link of a meeting. Returns the number of links removed.
    #[instrument(skip_all, name = "meeting_api.repo.detach_meeting", fields(meeting_id = %meeting_id))]
    pub async fn detach_meeting(
        conn: &mut SqliteConnection,
        meeting_id: &str,
    ) -> Result<u64, ApiError> {
        let result = sqlx::query("DELETE FROM meeting_participants WHERE meeting_id = ?")
            .bind(meeting_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                ApiError::Database(format!("Failed to unlink meeting participants: {}", e))
            })?;

        Ok(result.rows_affected())
    }

    /// Remove a participant from every meeting it belongs to. Returns the
    /// number of meetings it was removed from.
    #[instrument(skip_all, name = "meeting_api.repo.detach_participant", fields(participant_id = %participant_id))]
    pub async fn detach_participant(
        conn: &mut SqliteConnection,
        participant_id: &str,
    ) -> Result<u64, ApiError> {
        let result = sqlx::query("DELETE FROM meeting_participants WHERE participant_id = ?")
            .bind(participant_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                ApiError::Database(format!("Failed to unlink participant from meetings: {}", e))
            })?;

        Ok(result.rows_affected())
    }
}
