//! Route handlers
//!
//! - `health` - liveness probe
//! - `otp` - issue, validate and resend one-time passcodes
//! - `password_reset` - reset link issuance and redemption

pub mod health;
pub mod otp;
pub mod password_reset;
