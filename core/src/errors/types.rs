//! Reset token error types

use thiserror::Error;

/// Token-related errors
///
/// Every variant is surfaced to clients as 401; the variant only picks the
/// error code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    /// The password changed since the token was issued, so the link was used
    #[error("Token has already been used")]
    TokenRevoked,

    #[error("Token generation failed")]
    GenerationFailed,
}
