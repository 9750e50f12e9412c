//! # Moreshop Core
//!
//! Core business logic and domain layer for the Moreshop admin backend.
//! This crate contains the OTP verification and password reset services,
//! the repository interfaces they depend on (plus in-memory adapters),
//! and the error types shared by the outer layers.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{Category, Notification, OtpKey, OtpRecord, Subject, UserType};
pub use errors::{DomainError, DomainResult, TokenError};
pub use repositories::{IssueWrite, OtpRepository, SubjectDirectory, SubjectRepository};
pub use services::{
    CredentialService, NotificationDispatcher, OtpService, PasswordResetService,
};
