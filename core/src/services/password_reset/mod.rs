//! Password reset links: signed, short-lived and single-use.

mod config;
mod service;
mod signer;

#[cfg(test)]
mod tests;

pub use config::PasswordResetConfig;
pub use service::PasswordResetService;
pub use signer::{JwtResetTokenSigner, ResetTokenSigner};
