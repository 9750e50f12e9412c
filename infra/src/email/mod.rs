//! E-mail Service Module
//!
//! Delivers OTP e-mails and password reset links.
//!
//! - **SMTP**: lettre's async SMTP transport on the tokio runtime
//! - **Mock**: logs a masked summary only

use async_trait::async_trait;

use ms_shared::config::EmailConfig;

use crate::InfrastructureError;

pub mod mock_email;
pub mod smtp;

pub use mock_email::MockEmailService;
pub use smtp::SmtpEmailService;

#[cfg(test)]
mod tests;

/// A rendered e-mail ready to send
#[derive(Clone)]
pub struct OutgoingEmail<'a> {
    pub to: &'a str,
    pub subject: &'a str,
    pub text_body: &'a str,
    pub html_body: &'a str,
}

/// Common interface for e-mail providers
#[async_trait]
pub trait EmailService: Send + Sync {
    /// Send the e-mail, returning its message id
    async fn send_email(&self, email: &OutgoingEmail<'_>) -> Result<String, InfrastructureError>;

    fn provider_name(&self) -> &'static str;
}

/// Create an e-mail service based on configuration
pub fn create_email_service(
    config: &EmailConfig,
) -> Result<Box<dyn EmailService>, InfrastructureError> {
    match config.provider.as_str() {
        "smtp" => Ok(Box::new(SmtpEmailService::new(config)?)),
        "mock" => Ok(Box::new(MockEmailService::new())),
        other => {
            tracing::warn!(
                provider = other,
                "Unknown e-mail provider, using mock implementation"
            );
            Ok(Box::new(MockEmailService::new()))
        }
    }
}
