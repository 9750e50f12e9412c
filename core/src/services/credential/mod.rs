//! One-way hashing for OTP codes and passwords.

mod service;

pub use service::{BcryptCredentialService, CredentialService, HashedCode};
