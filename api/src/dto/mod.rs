//! Request and response bodies

pub mod otp;
pub mod password_reset;

pub use otp::{CreateOtpRequest, ResendOtpRequest, ValidateOtpRequest};
pub use password_reset::{PasswordResetLinkRequest, PasswordResetVerifyRequest};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `data` of responses that identify the affected subject
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectIdResponse {
    pub user_id: Uuid,
}
