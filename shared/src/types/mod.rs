//! Shared response types

pub mod response;

pub use response::{ApiResponse, HealthResponse, HealthStatus};
