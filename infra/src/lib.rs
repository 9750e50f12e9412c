//! # Infrastructure Layer
//!
//! Concrete implementations of the ports defined in `ms_core`:
//! - **Database**: MySQL subject and OTP repositories using SQLx
//! - **SMS**: Twilio REST delivery with retries, plus a logging mock
//! - **Email**: SMTP delivery through lettre, plus a logging mock
//! - **Notification**: routing of core notifications to the right channel

pub mod database;
pub mod email;
pub mod notification;
pub mod sms;

pub use database::{create_pool, run_migrations, MySqlOtpRepository, MySqlSubjectRepository};
pub use email::{create_email_service, EmailService};
pub use notification::ChannelDispatcher;
pub use sms::{create_sms_service, SmsService};

use ms_core::errors::DomainError;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failure
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// SMS service error
    #[error("SMS service error: {0}")]
    Sms(String),

    /// E-mail service error
    #[error("Email service error: {0}")]
    Email(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(error: InfrastructureError) -> Self {
        DomainError::Internal {
            message: error.to_string(),
        }
    }
}
