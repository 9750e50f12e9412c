//! Shared utilities and common types for the Moreshop admin backend
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - Error and success response envelopes
//! - Utility functions (phone, e-mail and password validation, log masking)

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, DatabaseConfig, EmailConfig, Environment, JwtConfig, LogFormat, LoggingConfig,
    NotificationConfig, OtpConfig, RateLimitConfig, ServerConfig, SmsConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use types::{ApiResponse, HealthResponse, HealthStatus};
pub use utils::{email, password, phone};
