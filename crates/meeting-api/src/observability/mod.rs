//! Observability for the Meeting API (Prometheus metrics).

pub mod metrics;
