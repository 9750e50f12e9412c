//! One-time passcode configuration

use serde::{Deserialize, Serialize};

use super::env_or;

/// OTP lifetime, hashing cost and background cleanup cadence
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Minutes before an issued code stops being accepted
    pub expiry_minutes: i64,

    /// bcrypt cost used when hashing codes
    pub hash_cost: u32,

    /// Seconds between sweeps of expired records
    pub cleanup_interval_secs: u64,

    /// Wrong guesses tolerated before a code is discarded
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            expiry_minutes: 10,
            hash_cost: 10,
            cleanup_interval_secs: 300,
            max_attempts: default_max_attempts(),
        }
    }
}

impl OtpConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            expiry_minutes: env_or("OTP_EXPIRY_MINUTES", defaults.expiry_minutes).max(1),
            // bcrypt rejects costs outside 4..=31
            hash_cost: env_or("OTP_HASH_COST", defaults.hash_cost).clamp(4, 31),
            cleanup_interval_secs: env_or(
                "OTP_CLEANUP_INTERVAL_SECS",
                defaults.cleanup_interval_secs,
            )
            .max(1),
            max_attempts: env_or("OTP_MAX_ATTEMPTS", defaults.max_attempts).max(1),
        }
    }
}

fn default_max_attempts() -> u32 {
    5
}
