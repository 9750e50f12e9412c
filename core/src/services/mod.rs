//! Business services containing domain logic and use cases.

pub mod credential;
pub mod notification;
pub mod otp;
pub mod password_reset;

// Re-export commonly used types
pub use credential::{BcryptCredentialService, CredentialService, HashedCode};
pub use notification::{NotificationDispatcher, RecordingNotificationDispatcher};
pub use otp::{
    IssueOtpRequest, IssueOutcome, OtpCleanupConfig, OtpCleanupService, OtpService,
    OtpServiceConfig, ResendOtpRequest, ResendOutcome, ValidateOtpRequest,
};
pub use password_reset::{
    JwtResetTokenSigner, PasswordResetConfig, PasswordResetService, ResetTokenSigner,
};
