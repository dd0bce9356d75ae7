//! Meetings repository for database operations.
//!
//! Participant membership lives in the association table and is handled by
//! [`super::MeetingParticipantsRepository`].

use crate::errors::ApiError;
use crate::models::{MeetingRow, NewMeeting};
use chrono::NaiveDateTime;
use sqlx::SqliteConnection;
use tracing::instrument;

/// Meetings repository for database operations.
pub struct MeetingsRepository;

impl MeetingsRepository {
    /// List all meetings, most recently modified first.
    #[instrument(skip_all, name = "meeting_api.repo.list_meetings")]
    pub async fn list_ordered_by_updated_at(
        conn: &mut SqliteConnection,
    ) -> Result<Vec<MeetingRow>, ApiError> {
        let rows = sqlx::query_as::<_, MeetingRow>(
            r#"
            SELECT id, title, "desc", date, location, created_at, updated_at
            FROM meetings
            ORDER BY updated_at DESC, id
            "#,
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| ApiError::Database(format!("Failed to list meetings: {}", e)))?;

        Ok(rows)
    }

    /// Get a meeting by id.
    #[instrument(skip_all, name = "meeting_api.repo.find_meeting", fields(meeting_id = %id))]
    pub async fn find_by_id(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> Result<Option<MeetingRow>, ApiError> {
        let row = sqlx::query_as::<_, MeetingRow>(
            r#"
            SELECT id, title, "desc", date, location, created_at, updated_at
            FROM meetings
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| ApiError::Database(format!("Failed to fetch meeting: {}", e)))?;

        Ok(row)
    }

    /// Insert a meeting row. Participant links are written separately.
    #[instrument(skip_all, name = "meeting_api.repo.insert_meeting", fields(meeting_id = %id))]
    pub async fn insert(
        conn: &mut SqliteConnection,
        id: &str,
        meeting: &NewMeeting,
        now: NaiveDateTime,
    ) -> Result<MeetingRow, ApiError> {
        let row = sqlx::query_as::<_, MeetingRow>(
            r#"
            INSERT INTO meetings (id, title, "desc", date, location, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id, title, "desc", date, location, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&meeting.title)
        .bind(&meeting.desc)
        .bind(meeting.date)
        .bind(&meeting.location)
        .bind(now) // created_at
        .bind(now) // updated_at
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| ApiError::Database(format!("Failed to insert meeting: {}", e)))?;

        Ok(row)
    }

    /// Write back every mutable column of `meeting`, stamping `updated_at`.
    #[instrument(skip_all, name = "meeting_api.repo.update_meeting", fields(meeting_id = %meeting.id))]
    pub async fn update(
        conn: &mut SqliteConnection,
        meeting: &MeetingRow,
        now: NaiveDateTime,
    ) -> Result<MeetingRow, ApiError> {
        let row = sqlx::query_as::<_, MeetingRow>(
            r#"
            UPDATE meetings
            SET title = ?, "desc" = ?, date = ?, location = ?, updated_at = ?
            WHERE id = ?
            RETURNING id, title, "desc", date, location, created_at, updated_at
            "#,
        )
        .bind(&meeting.title)
        .bind(&meeting.desc)
        .bind(meeting.date)
        .bind(&meeting.location)
        .bind(now)
        .bind(&meeting.id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| ApiError::Database(format!("Failed to update meeting: {}", e)))?;

        Ok(row)
    }

    /// Delete a meeting row. Returns the number of rows removed.
    ///
    /// Association rows must be removed first; the foreign key rejects the
    /// delete otherwise.
    #[instrument(skip_all, name = "meeting_api.repo.delete_meeting", fields(meeting_id = %id))]
    pub async fn delete(conn: &mut SqliteConnection, id: &str) -> Result<u64, ApiError> {
        let result = sqlx::query("DELETE FROM meetings WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(|e| ApiError::Database(format!("Failed to delete meeting: {}", e)))?;

        Ok(result.rows_affected())
    }
}
