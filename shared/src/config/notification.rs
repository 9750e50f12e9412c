//! Notification delivery configuration (SMS and e-mail)

use serde::{Deserialize, Serialize};

use super::env_or;

/// Everything the dispatchers need to reach a subject
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationConfig {
    /// Company name used in OTP message bodies
    pub company_name: String,

    /// Base URL of the admin frontend, used to build reset links
    pub frontend_url: String,

    pub sms: SmsConfig,

    pub email: EmailConfig,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            company_name: String::from("Moreshop"),
            frontend_url: String::from("http://localhost:3000"),
            sms: SmsConfig::default(),
            email: EmailConfig::default(),
        }
    }
}

impl NotificationConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            company_name: std::env::var("COMPANY_NAME").unwrap_or(defaults.company_name),
            frontend_url: std::env::var("FRONTEND_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.frontend_url),
            sms: SmsConfig::from_env(),
            email: EmailConfig::from_env(),
        }
    }
}

/// SMS provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmsConfig {
    /// `twilio` or `mock`
    pub provider: String,

    #[serde(skip_serializing)]
    pub twilio_account_sid: Option<String>,

    #[serde(skip_serializing)]
    pub twilio_auth_token: Option<String>,

    pub twilio_from_number: Option<String>,

    /// Attempts per message, including the first one
    pub max_retries: u32,

    /// Initial retry delay, doubled after every failed attempt
    pub retry_delay_ms: u64,

    pub request_timeout_secs: u64,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            provider: String::from("mock"),
            twilio_account_sid: None,
            twilio_auth_token: None,
            twilio_from_number: None,
            max_retries: 3,
            retry_delay_ms: 1000,
            request_timeout_secs: 30,
        }
    }
}

impl SmsConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            provider: std::env::var("SMS_PROVIDER")
                .map(|p| p.to_lowercase())
                .unwrap_or(defaults.provider),
            twilio_account_sid: std::env::var("TWILIO_ACCOUNT_SID").ok(),
            twilio_auth_token: std::env::var("TWILIO_AUTH_TOKEN").ok(),
            twilio_from_number: std::env::var("TWILIO_FROM_NUMBER").ok(),
            max_retries: env_or("TWILIO_MAX_RETRIES", defaults.max_retries).max(1),
            retry_delay_ms: env_or("TWILIO_RETRY_DELAY_MS", defaults.retry_delay_ms),
            request_timeout_secs: env_or(
                "TWILIO_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            ),
        }
    }
}

/// E-mail provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    /// `smtp` or `mock`
    pub provider: String,

    pub smtp_host: String,

    pub smtp_port: u16,

    /// Upgrade the connection with STARTTLS; off only for local catch-all servers
    pub smtp_starttls: bool,

    pub smtp_username: Option<String>,

    #[serde(skip_serializing)]
    pub smtp_password: Option<String>,

    /// Mailbox used in the From header
    pub from_address: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            provider: String::from("mock"),
            smtp_host: String::from("localhost"),
            smtp_port: 587,
            smtp_starttls: true,
            smtp_username: None,
            smtp_password: None,
            from_address: String::from("Moreshop <no-reply@moreshop.local>"),
        }
    }
}

impl EmailConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            provider: std::env::var("EMAIL_PROVIDER")
                .map(|p| p.to_lowercase())
                .unwrap_or(defaults.provider),
            smtp_host: std::env::var("SMTP_HOST").unwrap_or(defaults.smtp_host),
            smtp_port: env_or("SMTP_PORT", defaults.smtp_port),
            smtp_starttls: env_or("SMTP_STARTTLS", defaults.smtp_starttls),
            smtp_username: std::env::var("SMTP_USERNAME").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
            from_address: std::env::var("SMTP_FROM").unwrap_or(defaults.from_address),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_use_mock_providers() {
        let config = NotificationConfig::default();
        assert_eq!(config.company_name, "Moreshop");
        assert_eq!(config.sms.provider, "mock");
        assert_eq!(config.email.provider, "mock");
    }

    #[test]
    fn test_secrets_are_not_serialized() {
        let config = SmsConfig {
            twilio_auth_token: Some("top-secret".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("top-secret"));
    }
}
