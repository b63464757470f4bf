//! Foreman — single-coordinator work distribution over HTTP.

pub mod api;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod telemetry;
