//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical business areas:
//! - `auth` - Reset-token signing configuration
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection and logging configuration
//! - `notification` - SMS and e-mail delivery providers
//! - `otp` - One-time passcode lifetime and hashing
//! - `rate_limit` - Rate limiting for the public endpoints
//! - `server` - HTTP server and CORS configuration

pub mod auth;
pub mod database;
pub mod environment;
pub mod notification;
pub mod otp;
pub mod rate_limit;
pub mod server;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use auth::JwtConfig;
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use notification::{EmailConfig, NotificationConfig, SmsConfig};
pub use otp::OtpConfig;
pub use rate_limit::RateLimitConfig;
pub use server::{CorsConfig, ServerConfig};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Reset-token signing configuration
    pub jwt: JwtConfig,

    /// OTP lifetime and hashing configuration
    pub otp: OtpConfig,

    /// Notification providers
    pub notification: NotificationConfig,

    /// Rate limiting configuration
    pub rate_limit: RateLimitConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            jwt: JwtConfig::default(),
            otp: OtpConfig::default(),
            notification: NotificationConfig::default(),
            rate_limit: RateLimitConfig::for_environment(env),
            cors: CorsConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            jwt: JwtConfig::from_env(),
            otp: OtpConfig::from_env(),
            notification: NotificationConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(environment),
            cors: CorsConfig::from_env(environment),
            logging: LoggingConfig::from_env(environment),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }
}

/// Read an environment variable and parse it, falling back to `default`
/// when the variable is missing or unparseable.
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_development() {
        let config = AppConfig::default();
        assert!(config.environment.is_development());
        assert!(!config.is_production());
        assert!(!config.rate_limit.enabled);
    }

    #[test]
    fn test_env_or_falls_back_on_garbage() {
        std::env::set_var("MS_SHARED_TEST_PORT", "not-a-number");
        assert_eq!(env_or("MS_SHARED_TEST_PORT", 8080u16), 8080);
        std::env::set_var("MS_SHARED_TEST_PORT", " 9090 ");
        assert_eq!(env_or("MS_SHARED_TEST_PORT", 8080u16), 9090);
        std::env::remove_var("MS_SHARED_TEST_PORT");
        assert_eq!(env_or("MS_SHARED_TEST_PORT", 7u16), 7);
    }
}
