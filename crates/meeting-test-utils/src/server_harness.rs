//! In-process Meeting API server for integration tests.

use meeting_api::config::Config;
use meeting_api::routes::{self, AppState};
use metrics_exporter_prometheus::PrometheusBuilder;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// A Meeting API instance serving the real router over a test database.
///
/// ```rust,ignore
/// #[sqlx::test(migrations = "../../migrations")]
/// async fn test_lists_meetings(pool: SqlitePool) -> Result<(), anyhow::Error> {
///     let server = TestMeetingServer::spawn(pool).await?;
///     let response = reqwest::get(server.endpoint("/meetings")).await?;
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestMeetingServer {
    addr: SocketAddr,
    pool: SqlitePool,
    server: JoinHandle<()>,
}

impl TestMeetingServer {
    /// Serve the API on an ephemeral loopback port until the harness is
    /// dropped.
    ///
    /// Metrics go to a recorder that is never installed globally, so tests
    /// in one binary do not share counters.
    pub async fn spawn(pool: SqlitePool) -> Result<Self, anyhow::Error> {
        // DATABASE_URL is required by Config but unused: the pool is injected.
        let config = Config::from_vars(&HashMap::from([
            ("DATABASE_URL".to_string(), "sqlite::memory:".to_string()),
            ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
            ("SHUTDOWN_DRAIN_SECONDS".to_string(), "0".to_string()),
        ]))
        .map_err(|e| anyhow::anyhow!("Invalid test config: {e}"))?;

        let app = routes::build_routes(
            Arc::new(AppState {
                pool: pool.clone(),
                config,
            }),
            PrometheusBuilder::new().build_recorder().handle(),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Meeting API test server stopped: {e}");
            }
        });

        Ok(Self { addr, pool, server })
    }

    /// Base URL, e.g. `http://127.0.0.1:41234`.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Absolute URL for an API path such as `/meetings/{id}`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.url(), path)
    }

    /// The database the server writes to, for asserting on stored rows.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl Drop for TestMeetingServer {
    fn drop(&mut self) {
        self.server.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_spawned_server_serves_api_from_given_pool(
        pool: SqlitePool,
    ) -> Result<(), anyhow::Error> {
        sqlx::query(
            "INSERT INTO participants (id, name, season, phone, created_at, updated_at) \
             VALUES ('p-1', 'Kim', 'S1', '010-0000-0001', '2026-01-01 00:00:00', '2026-01-01 00:00:00')",
        )
        .execute(&pool)
        .await?;

        let server = TestMeetingServer::spawn(pool).await?;

        let body: serde_json::Value = reqwest::get(server.endpoint("/participants/p-1"))
            .await?
            .json()
            .await?;
        assert_eq!(body["name"], "Kim");

        Ok(())
    }
}
