//! OTP verification service module
//!
//! This module provides the one-time passcode workflow used to verify a
//! subject's contact channels:
//! - Issuance with per-destination deduplication
//! - Validation that consumes the code exactly once
//! - Unconditional resend
//! - Background removal of expired codes

mod cleanup;
mod config;
mod service;
mod types;

#[cfg(test)]
pub(crate) mod tests;

pub use cleanup::{OtpCleanupConfig, OtpCleanupService};
pub use config::OtpServiceConfig;
pub use service::{normalize_destination, OtpService};
pub use types::{
    IssueOtpRequest, IssueOutcome, ResendOtpRequest, ResendOutcome, ValidateOtpRequest,
};
