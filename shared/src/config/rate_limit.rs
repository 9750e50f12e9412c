//! Rate limiting configuration

use serde::{Deserialize, Serialize};

use super::{env_or, Environment};

/// Fixed-window limit applied per client IP to the public endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    pub enabled: bool,

    /// Requests allowed per window
    pub max_requests: u32,

    /// Window length in seconds
    pub window_secs: u64,
}

impl RateLimitConfig {
    /// Enabled in production only, 100 requests per 15 minutes
    pub fn for_environment(env: Environment) -> Self {
        Self {
            enabled: env.is_production(),
            max_requests: 100,
            window_secs: 15 * 60,
        }
    }

    pub fn from_env(env: Environment) -> Self {
        let defaults = Self::for_environment(env);
        Self {
            enabled: env_or("RATE_LIMIT_ENABLED", defaults.enabled),
            max_requests: env_or("RATE_LIMIT_MAX_REQUESTS", defaults.max_requests).max(1),
            window_secs: env_or("RATE_LIMIT_WINDOW_SECS", defaults.window_secs).max(1),
        }
    }
}
