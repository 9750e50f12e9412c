//! OTP route handlers

pub mod create;
pub mod resend;
pub mod validate;

pub use create::create_otp;
pub use resend::resend_otp;
pub use validate::validate_otp;

use ms_core::domain::entities::subject::Category;
use ms_core::errors::DomainError;

/// Parse the `{type}` path segment
pub(crate) fn parse_category(raw: &str) -> Result<Category, DomainError> {
    raw.parse()
        .map_err(|_| DomainError::validation("type must be one of phoneNo, email"))
}
