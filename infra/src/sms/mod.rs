//! SMS Service Module
//!
//! SMS delivery for phone-number OTPs. Two providers exist:
//!
//! - **Twilio**: production delivery through the Twilio REST API
//! - **Mock**: logs a masked summary and returns a synthetic message id
//!
//! [`create_sms_service`] picks one from [`SmsConfig`].

use async_trait::async_trait;

use ms_shared::config::SmsConfig;

use crate::InfrastructureError;

pub mod mock_sms;
pub mod twilio;

pub use mock_sms::MockSmsService;
pub use twilio::{TwilioConfig, TwilioSmsService};

#[cfg(test)]
mod tests;

/// Common interface for SMS providers
#[async_trait]
pub trait SmsService: Send + Sync {
    /// Send `body` to an E.164 number, returning the provider message id
    async fn send_sms(&self, to: &str, body: &str) -> Result<String, InfrastructureError>;

    /// Short provider name for logs
    fn provider_name(&self) -> &'static str;
}

/// Create an SMS service based on configuration
///
/// Unknown providers fall back to the mock with a warning. A `twilio`
/// provider with missing credentials is a configuration error, so a
/// production deployment cannot silently stop sending messages.
pub fn create_sms_service(config: &SmsConfig) -> Result<Box<dyn SmsService>, InfrastructureError> {
    match config.provider.as_str() {
        "twilio" => {
            let twilio_config = TwilioConfig::from_sms_config(config)?;
            Ok(Box::new(TwilioSmsService::new(twilio_config)?))
        }
        "mock" => Ok(Box::new(MockSmsService::new())),
        other => {
            tracing::warn!(
                provider = other,
                "Unknown SMS provider, using mock implementation"
            );
            Ok(Box::new(MockSmsService::new()))
        }
    }
}
