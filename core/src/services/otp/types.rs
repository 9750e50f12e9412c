//! Request and result types for the OTP service

use std::fmt;
use uuid::Uuid;

use crate::domain::entities::subject::{Category, UserType};

/// Ask for a code to be sent to `destination`
#[derive(Debug, Clone)]
pub struct IssueOtpRequest {
    /// Existing subject, or `None` to register a new bare subject
    pub user_id: Option<Uuid>,
    pub user_type: UserType,
    pub category: Category,
    pub destination: String,
}

/// Ask for a fresh code regardless of any pending one
#[derive(Debug, Clone)]
pub struct ResendOtpRequest {
    pub user_id: Uuid,
    pub user_type: UserType,
    pub category: Category,
    pub destination: String,
}

/// Submit a code for checking
#[derive(Clone)]
pub struct ValidateOtpRequest {
    pub user_id: Uuid,
    pub user_type: UserType,
    pub category: Category,
    pub otp: String,
}

impl fmt::Debug for ValidateOtpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidateOtpRequest")
            .field("user_id", &self.user_id)
            .field("user_type", &self.user_type)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

/// Outcome of an issuance. None of these carries the plaintext code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueOutcome {
    /// A new code was stored and delivered
    Sent { subject_id: Uuid, message_id: String },
    /// A live code for the same destination is still pending
    AlreadySent { subject_id: Uuid },
    /// The channel is already verified; nothing was issued
    AlreadyVerified { subject_id: Uuid, destination: String },
}

impl IssueOutcome {
    pub fn subject_id(&self) -> Uuid {
        match self {
            IssueOutcome::Sent { subject_id, .. }
            | IssueOutcome::AlreadySent { subject_id }
            | IssueOutcome::AlreadyVerified { subject_id, .. } => *subject_id,
        }
    }

    pub fn message(&self) -> String {
        match self {
            IssueOutcome::Sent { .. } => "OTP sent successfully".to_string(),
            IssueOutcome::AlreadySent { .. } => "OTP already sent".to_string(),
            IssueOutcome::AlreadyVerified { destination, .. } => {
                format!("{} already verified for this userId", destination)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResendOutcome {
    pub subject_id: Uuid,
    pub message_id: String,
}

impl ResendOutcome {
    pub fn message(&self) -> &'static str {
        "OTP resent successfully"
    }
}
