//! Profiles repository for database operations.
//!
//! Profiles are addressed by their owning participant id.

use crate::errors::ApiError;
use crate::models::ProfileRow;
use sqlx::SqliteConnection;
use tracing::instrument;

/// Profiles repository for database operations.
pub struct ProfilesRepository;

impl ProfilesRepository {
    /// Get the profile owned by a participant.
    #[instrument(skip_all, name = "meeting_api.repo.find_profile", fields(participant_id = %participant_id))]
    pub async fn find_by_participant_id(
        conn: &mut SqliteConnection,
        participant_id: &str,
    ) -> Result<Option<ProfileRow>, ApiError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, image_url, participant_id
            FROM profiles
            WHERE participant_id = ?
            "#,
        )
        .bind(participant_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| ApiError::Database(format!("Failed to fetch profile: {}", e)))?;

        Ok(row)
    }

    /// Insert a profile owned by `participant_id`.
    ///
    /// `participant_id` is UNIQUE, so a second profile for the same
    /// participant is rejected by the store.
    #[instrument(skip_all, name = "meeting_api.repo.insert_profile", fields(participant_id = %participant_id))]
    pub async fn insert(
        conn: &mut SqliteConnection,
        id: &str,
        participant_id: &str,
        image_url: Option<&str>,
    ) -> Result<ProfileRow, ApiError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            INSERT INTO profiles (id, image_url, participant_id)
            VALUES (?, ?, ?)
            RETURNING id, image_url, participant_id
            "#,
        )
        .bind(id)
        .bind(image_url)
        .bind(participant_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| ApiError::Database(format!("Failed to insert profile: {}", e)))?;

        Ok(row)
    }

    /// Replace the image URL of a profile.
    #[instrument(skip_all, name = "meeting_api.repo.update_profile", fields(profile_id = %id))]
    pub async fn update_image_url(
        conn: &mut SqliteConnection,
        id: &str,
        image_url: Option<&str>,
    ) -> Result<ProfileRow, ApiError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            UPDATE profiles
            SET image_url = ?
            WHERE id = ?
            RETURNING id, image_url, participant_id
            "#,
        )
        .bind(image_url)
        .bind(id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| ApiError::Database(format!("Failed to update profile: {}", e)))?;

        Ok(row)
    }

    /// Delete a profile by its own id.
    #[instrument(skip_all, name = "meeting_api.repo.delete_profile", fields(profile_id = %id))]
    pub async fn delete(conn: &mut SqliteConnection, id: &str) -> Result<u64, ApiError> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(|e| ApiError::Database(format!("Failed to delete profile: {}", e)))?;

        Ok(result.rows_affected())
    }

    /// Delete whatever profile `participant_id` owns. Returns rows removed
    /// (0 when the participant has none).
    #[instrument(skip_all, name = "meeting_api.repo.delete_profile_by_participant", fields(participant_id = %participant_id))]
    pub async fn delete_by_participant_id(
        conn: &mut SqliteConnection,
        participant_id: &str,
    ) -> Result<u64, ApiError> {
        let result = sqlx::query("DELETE FROM profiles WHERE participant_id = ?")
            .bind(participant_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| ApiError::Database(format!("Failed to delete profile: {}", e)))?;

        Ok(result.rows_affected())
    }
}
