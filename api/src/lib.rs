//! Moreshop admin API
//!
//! HTTP surface for OTP verification and password reset links. The binary in
//! `main.rs` wires MySQL and the configured delivery providers; tests build
//! the same application over the in-memory adapters from `ms_core`.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;

pub use app::{configure, json_config, not_found, AppState};
