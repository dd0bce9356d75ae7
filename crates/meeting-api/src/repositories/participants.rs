//! Participants repository for database operations.
//!
//! Every read joins the owned profile (if any) so callers get the full
//! participant projection from a single query.

use crate::errors::ApiError;
use crate::models::{NewParticipant, ParticipantRow};
use chrono::NaiveDateTime;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use tracing::instrument;

/// Column list for [`ParticipantRow`], with `p` = participants and
/// `pr` = profiles.
pub(crate) const PARTICIPANT_COLUMNS: &str = r#"
    p.id, p.name, p.season, p.phone, p.created_at, p.updated_at,
    pr.id AS profile_id, pr.image_url AS profile_image_url
"#;

/// Participants repository for database operations.
pub struct ParticipantsRepository;

impl ParticipantsRepository {
    /// List all participants in creation order.
    #[instrument(skip_all, name = "meeting_api.repo.list_participants")]
    pub async fn list_all(conn: &mut SqliteConnection) -> Result<Vec<ParticipantRow>, ApiError> {
        let sql = format!(
            r#"
            SELECT {PARTICIPANT_COLUMNS}
            FROM participants p
            LEFT JOIN profiles pr ON pr.participant_id = p.id
            ORDER BY p.created_at, p.id
            "#
        );

        let rows = sqlx::query_as::<_, ParticipantRow>(&sql)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| ApiError::Database(format!("Failed to list participants: {}", e)))?;

        Ok(rows)
    }

    /// Get a participant by id.
    #[instrument(skip_all, name = "meeting_api.repo.find_participant", fields(participant_id = %id))]
    pub async fn find_by_id(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> Result<Option<ParticipantRow>, ApiError> {
        let sql = format!(
            r#"
            SELECT {PARTICIPANT_COLUMNS}
            FROM participants p
            LEFT JOIN profiles pr ON pr.participant_id = p.id
            WHERE p.id = ?
            "#
        );

        let row = sqlx::query_as::<_, ParticipantRow>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| ApiError::Database(format!("Failed to fetch participant: {}", e)))?;

        Ok(row)
    }

    /// Get every participant whose id is in `ids`.
    ///
    /// Ids that do not resolve are skipped and duplicates collapse, so the
    /// result may be shorter than `ids`.
    #[instrument(skip_all, name = "meeting_api.repo.find_participants_by_ids", fields(requested = ids.len()))]
    pub async fn find_all_by_ids(
        conn: &mut SqliteConnection,
        ids: &[String],
    ) -> Result<Vec<ParticipantRow>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            r#"
            SELECT {PARTICIPANT_COLUMNS}
            FROM participants p
            LEFT JOIN profiles pr ON pr.participant_id = p.id
            WHERE p.id IN (
            "#
        ));
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(id.as_str());
        }
        separated.push_unseparated(") ORDER BY p.created_at, p.id");

        let rows = builder
            .build_query_as::<ParticipantRow>()
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| ApiError::Database(format!("Failed to fetch participants: {}", e)))?;

        Ok(rows)
    }

    /// Get a participant by phone number.
    #[instrument(skip_all, name = "meeting_api.repo.find_participant_by_phone")]
    pub async fn find_by_phone(
        conn: &mut SqliteConnection,
        phone: &str,
    ) -> Result<Option<ParticipantRow>, ApiError> {
        let sql = format!(
            r#"
            SELECT {PARTICIPANT_COLUMNS}
            FROM participants p
            LEFT JOIN profiles pr ON pr.participant_id = p.id
            WHERE p.phone = ?
            "#
        );

        let row = sqlx::query_as::<_, ParticipantRow>(&sql)
            .bind(phone)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                ApiError::Database(format!("Failed to fetch participant by phone: {}", e))
            })?;

        Ok(row)
    }

    /// Insert a participant and return it (without a profile).
    #[instrument(skip_all, name = "meeting_api.repo.insert_participant", fields(participant_id = %id))]
    pub async fn insert(
        conn: &mut SqliteConnection,
        id: &str,
        participant: &NewParticipant,
        now: NaiveDateTime,
    ) -> Result<ParticipantRow, ApiError> {
        sqlx::query(
            r#"
            INSERT INTO participants (id, name, season, phone, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(&participant.name)
        .bind(&participant.season)
        .bind(&participant.phone)
        .bind(now) // created_at
        .bind(now) // updated_at
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return ApiError::Duplicate("Phone number is already registered".to_string());
                }
            }
            ApiError::Database(format!("Failed to insert participant: {}", e))
        })?;

        Self::find_by_id(conn, id)
            .await?
            .ok_or_else(|| ApiError::Internal("Inserted participant not readable".to_string()))
    }

    /// Write back the mutable columns of `participant`, stamping `updated_at`.
    #[instrument(skip_all, name = "meeting_api.repo.update_participant", fields(participant_id = %participant.id))]
    pub async fn update(
        conn: &mut SqliteConnection,
        participant: &ParticipantRow,
        now: NaiveDateTime,
    ) -> Result<ParticipantRow, ApiError> {
        sqlx::query(
            r#"
            UPDATE participants
            SET name = ?, season = ?, phone = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&participant.name)
        .bind(&participant.season)
        .bind(&participant.phone)
        .bind(now)
        .bind(&participant.id)
        .execute(&mut *conn)
        .await
        .map_err(|e| ApiError::Database(format!("Failed to update participant: {}", e)))?;

        Self::find_by_id(conn, &participant.id)
            .await?
            .ok_or_else(|| ApiError::Internal("Updated participant not readable".to_string()))
    }

    /// Delete a participant row. Returns the number of rows removed.
    ///
    /// The owned profile and association rows must be removed first.
    #[instrument(skip_all, name = "meeting_api.repo.delete_participant", fields(participant_id = %id))]
    pub async fn delete(conn: &mut SqliteConnection, id: &str) -> Result<u64, ApiError> {
        let result = sqlx::query("DELETE FROM participants WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(|e| ApiError::Database(format!("Failed to delete participant: {}", e)))?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sqlx::SqlitePool;

    fn new_participant(phone: &str) -> NewParticipant {
        NewParticipant {
            name: "Kim".to_string(),
            season: "S1".to_string(),
            phone: phone.to_string(),
        }
    }

    #[sqlx::test(migrator = "crate::MIGRATOR")]
    async fn test_insert_with_taken_phone_is_duplicate(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let now = Utc::now().naive_utc();

        ParticipantsRepository::insert(&mut *conn, "p-1", &new_participant("010-1111-2222"), now)
            .await
            .unwrap();

        let result =
            ParticipantsRepository::insert(&mut *conn, "p-2", &new_participant("010-1111-2222"), now)
                .await;

        assert!(matches!(result, Err(ApiError::Duplicate(_))));
        assert!(ParticipantsRepository::find_by_id(&mut *conn, "p-2")
            .await
            .unwrap()
            .is_none());
    }
}
