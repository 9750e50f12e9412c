//! MySQL repository implementations

pub mod otp_repository;
pub mod subject_repository;

pub use otp_repository::MySqlOtpRepository;
pub use subject_repository::MySqlSubjectRepository;

use ms_core::errors::DomainError;

/// Map a driver error into the domain's opaque internal error
pub(crate) fn db_error(context: &str, error: sqlx::Error) -> DomainError {
    tracing::error!(error = %error, context, "database operation failed");
    DomainError::Internal {
        message: format!("{}: {}", context, error),
    }
}

/// Read a CHAR(36) column as a UUID
pub(crate) fn parse_uuid(column: &str, value: &str) -> Result<uuid::Uuid, DomainError> {
    uuid::Uuid::parse_str(value).map_err(|e| DomainError::Internal {
        message: format!("Invalid UUID in {}: {}", column, e),
    })
}
