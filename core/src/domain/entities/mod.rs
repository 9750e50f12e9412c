//! Domain entities representing core business objects.

pub mod otp_record;
pub mod reset_token;
pub mod subject;

#[cfg(test)]
mod tests;

pub use otp_record::{OtpKey, OtpRecord};
pub use reset_token::PasswordResetClaims;
pub use subject::{Category, Subject, UserType};
