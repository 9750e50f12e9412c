//! Configuration for the OTP service

use ms_shared::config::{NotificationConfig, OtpConfig};

use crate::domain::entities::otp_record::{DEFAULT_EXPIRATION_MINUTES, DEFAULT_MAX_ATTEMPTS};

/// Configuration for the OTP service
#[derive(Debug, Clone)]
pub struct OtpServiceConfig {
    /// Number of minutes before an issued code expires
    pub expiration_minutes: i64,
    /// Company name shown in the message body
    pub company_name: String,
    /// Wrong guesses a code tolerates before it is discarded
    pub max_attempts: u32,
}

impl Default for OtpServiceConfig {
    fn default() -> Self {
        Self {
            expiration_minutes: DEFAULT_EXPIRATION_MINUTES,
            company_name: "Moreshop".to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl OtpServiceConfig {
    pub fn from_app_config(otp: &OtpConfig, notification: &NotificationConfig) -> Self {
        Self {
            expiration_minutes: otp.expiry_minutes,
            company_name: notification.company_name.clone(),
            max_attempts: otp.max_attempts,
        }
    }
}
