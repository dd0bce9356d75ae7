//! Meeting API Service Library
//!
//! A JSON-over-HTTP backend that manages three related records:
//!
//! - Meetings (title, description, date, location) with a set of participants
//! - Participants (name, season, unique phone number)
//! - Profiles (optional image URL), at most one per participant
//!
//! # Architecture
//!
//! Handler -> Service -> Repository:
//!
//! ```text
//! routes/mod.rs -> handlers/*.rs -> services/*.rs -> repositories/*.rs
//! ```
//!
//! # Modules
//!
//! - `config` - Service configuration from environment
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `middleware` - HTTP metrics middleware
//! - `models` - Rows, request bodies and response projections
//! - `observability` - Prometheus metrics
//! - `repositories` - SQLite access
//! - `routes` - Axum router setup
//! - `services` - Business rules and transactions

pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
pub mod services;

/// Embedded schema migrations, applied at startup and by `#[sqlx::test]`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");
