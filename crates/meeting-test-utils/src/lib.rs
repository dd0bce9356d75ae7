//! # Meeting API Test Utilities
//!
//! Shared test utilities for the Meeting API service.
//!
//! This crate provides:
//! - `TestMeetingServer`, the real router served over a `#[sqlx::test]` pool
//!
//! ## Usage
//!
//! ```rust,ignore
//! use meeting_test_utils::*;
//!
//! #[sqlx::test(migrations = "../../migrations")]
//! async fn test_example(pool: SqlitePool) -> Result<()> {
//!     let server = TestMeetingServer::spawn(pool).await?;
//!     let client = reqwest::Client::new();
//!
//!     let response = client
//!         .get(&format!("{}/meetings", server.url()))
//!         .send()
//!         .await?;
//!
//!     assert_eq!(response.status(), 200);
//!     Ok(())
//! }
//! ```

pub mod server_harness;

pub use server_harness::*;
