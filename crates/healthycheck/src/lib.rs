//! Child health check: observation intake, risk scoring, assessment history,
//! and the article feed, plus the HTTP surface the service binary mounts.

pub mod articles;
pub mod checkup;
pub mod config;
pub mod error;
pub mod store;
pub mod telemetry;
