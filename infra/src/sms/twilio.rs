//! Twilio SMS Service Implementation
//!
//! Talks to the Twilio Messages REST endpoint directly over reqwest.
//!
//! ## Features
//!
//! - Automatic retry with exponential backoff on rate limits, server errors
//!   and transport failures
//! - No retry on other client errors (bad number, bad credentials)
//! - Phone number masking in logs

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use ms_shared::config::SmsConfig;
use ms_shared::utils::mask_phone_number;

use crate::InfrastructureError;

use super::SmsService;

const TWILIO_API_BASE: &str = "https://api.twilio.com";

/// Twilio SMS service configuration
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    /// Twilio Account SID
    pub account_sid: String,
    /// Twilio Auth Token
    pub auth_token: String,
    /// From phone number (must be a Twilio phone number)
    pub from_number: String,
    /// Maximum attempts per message
    pub max_retries: u32,
    /// Initial retry delay in milliseconds
    pub retry_delay_ms: u64,
    /// Timeout for API requests in seconds
    pub request_timeout_secs: u64,
    /// API root, overridable for tests
    pub api_base: String,
}

impl TwilioConfig {
    /// Build from the generic SMS configuration
    pub fn from_sms_config(config: &SmsConfig) -> Result<Self, InfrastructureError> {
        let required = |value: &Option<String>, name: &str| {
            value
                .clone()
                .filter(|v| !v.is_empty())
                .ok_or_else(|| InfrastructureError::Config(format!("{} not set", name)))
        };

        let from_number = required(&config.twilio_from_number, "TWILIO_FROM_NUMBER")?;
        if !from_number.starts_with('+') {
            return Err(InfrastructureError::Config(
                "TWILIO_FROM_NUMBER must be in E.164 format (starting with '+')".to_string(),
            ));
        }

        Ok(Self {
            account_sid: required(&config.twilio_account_sid, "TWILIO_ACCOUNT_SID")?,
            auth_token: required(&config.twilio_auth_token, "TWILIO_AUTH_TOKEN")?,
            from_number,
            max_retries: config.max_retries.max(1),
            retry_delay_ms: config.retry_delay_ms,
            request_timeout_secs: config.request_timeout_secs,
            api_base: TWILIO_API_BASE.to_string(),
        })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base.trim_end_matches('/'),
            self.account_sid
        )
    }
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    sid: String,
}

/// Outcome of a single attempt
enum Attempt {
    Sent(String),
    Retryable(String),
    Fatal(String),
}

/// Twilio SMS service implementation
pub struct TwilioSmsService {
    client: reqwest::Client,
    config: TwilioConfig,
}

impl TwilioSmsService {
    /// Create a new Twilio SMS service
    pub fn new(config: TwilioConfig) -> Result<Self, InfrastructureError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        info!(
            from = %mask_phone_number(&config.from_number),
            "Twilio SMS service initialized"
        );

        Ok(Self { client, config })
    }

    async fn attempt(&self, to: &str, body: &str) -> Attempt {
        let params = [
            ("To", to),
            ("From", self.config.from_number.as_str()),
            ("Body", body),
        ];

        let response = match self
            .client
            .post(self.config.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Attempt::Retryable(format!("request failed: {}", e)),
        };

        let status = response.status();
        if status.is_success() {
            return match response.json::<MessageResponse>().await {
                Ok(message) => Attempt::Sent(message.sid),
                Err(e) => Attempt::Fatal(format!("unreadable Twilio response: {}", e)),
            };
        }

        let detail = response.text().await.unwrap_or_default();
        if status.as_u16() == 429 || status.is_server_error() {
            Attempt::Retryable(format!("Twilio returned {}: {}", status, detail))
        } else {
            Attempt::Fatal(format!("Twilio returned {}: {}", status, detail))
        }
    }

    /// Send SMS with retry logic
    async fn send_with_retry(&self, to: &str, body: &str) -> Result<String, InfrastructureError> {
        let mut delay = Duration::from_millis(self.config.retry_delay_ms);

        for attempt in 1..=self.config.max_retries {
            debug!(
                attempt,
                max = self.config.max_retries,
                to = %mask_phone_number(to),
                "Sending SMS"
            );

            match self.attempt(to, body).await {
                Attempt::Sent(sid) => {
                    info!(
                        to = %mask_phone_number(to),
                        sid = %sid,
                        provider = "twilio",
                        event = "sms_sent",
                        "SMS sent"
                    );
                    return Ok(sid);
                }
                Attempt::Fatal(reason) => {
                    error!(to = %mask_phone_number(to), reason = %reason, "SMS rejected");
                    return Err(InfrastructureError::Sms(reason));
                }
                Attempt::Retryable(reason) if attempt < self.config.max_retries => {
                    warn!(
                        attempt,
                        reason = %reason,
                        delay_ms = delay.as_millis() as u64,
                        "SMS attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Attempt::Retryable(reason) => {
                    error!(to = %mask_phone_number(to), reason = %reason, "SMS failed");
                    return Err(InfrastructureError::Sms(format!(
                        "Failed to send SMS after {} attempts: {}",
                        self.config.max_retries, reason
                    )));
                }
            }
        }

        Err(InfrastructureError::Sms("No SMS attempt was made".to_string()))
    }
}

#[async_trait]
impl SmsService for TwilioSmsService {
    async fn send_sms(&self, to: &str, body: &str) -> Result<String, InfrastructureError> {
        self.send_with_retry(to, body).await
    }

    fn provider_name(&self) -> &'static str {
        "twilio"
    }
}
