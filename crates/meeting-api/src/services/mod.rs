//! Service layer for the Meeting API.
//!
//! Services own the business rules and transaction boundaries. Reads run on
//! a pooled connection; every write runs in one transaction that commits
//! only when all of its statements succeed. Write transactions take the
//! SQLite write lock when they begin, so concurrent writers queue on the
//! busy timeout instead of failing on a read-to-write lock upgrade.

pub mod meeting_service;
pub mod participant_service;
pub mod profile_service;

pub use meeting_service::MeetingService;
pub use participant_service::ParticipantService;
pub use profile_service::ProfileService;

use crate::errors::ApiError;
use crate::observability::metrics::record_operation;
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::future::Future;
use std::time::Instant;

/// Begin a write transaction holding the database write lock.
pub(crate) async fn begin_write(
    pool: &SqlitePool,
) -> Result<Transaction<'static, Sqlite>, ApiError> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}

/// Await `fut` and record its duration and outcome under `entity`/`operation`.
pub(crate) async fn timed<T, F>(
    entity: &'static str,
    operation: &'static str,
    fut: F,
) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    let start = Instant::now();
    let result = fut.await;
    let outcome = match &result {
        Ok(_) => "success",
        Err(e) => outcome_label(e),
    };
    record_operation(entity, operation, outcome, start.elapsed());
    result
}

fn outcome_label(error: &ApiError) -> &'static str {
    match error {
        ApiError::NotFound(_) => "not_found",
        ApiError::Duplicate(_) | ApiError::Validation(_) | ApiError::BadRequest(_) => "rejected",
        ApiError::Database(_) | ApiError::Internal(_) => "error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_outcome_label() {
        assert_eq!(outcome_label(&ApiError::NotFound("x".into())), "not_found");
        assert_eq!(outcome_label(&ApiError::Duplicate("x".into())), "rejected");
        assert_eq!(
            outcome_label(&ApiError::Validation(BTreeMap::new())),
            "rejected"
        );
        assert_eq!(outcome_label(&ApiError::Database("x".into())), "error");
    }

    #[tokio::test]
    async fn test_timed_passes_result_through() {
        let ok = timed("meeting", "get", async { Ok::<_, ApiError>(7) }).await;
        assert!(matches!(ok, Ok(7)));

        let err = timed("meeting", "get", async {
            Err::<i32, _>(ApiError::NotFound("Meeting not found".into()))
        })
        .await;
        assert!(matches!(err, Err(ApiError::NotFound(_))));
    }
}
