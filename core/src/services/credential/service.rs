//! bcrypt-backed credential service

use async_trait::async_trait;
use rand::{rngs::OsRng, Rng};
use std::fmt;

use crate::domain::entities::otp_record::CODE_LENGTH;
use crate::errors::{DomainError, DomainResult};

/// A freshly generated code and its hash
#[derive(Clone)]
pub struct HashedCode {
    pub plaintext: String,
    pub hash: String,
}

impl fmt::Debug for HashedCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedCode")
            .field("plaintext", &"[redacted]")
            .finish_non_exhaustive()
    }
}

/// Hashing and verification of short-lived codes and long-lived secrets
#[async_trait]
pub trait CredentialService: Send + Sync {
    /// Generate a random 6-digit code and hash it
    async fn generate_hashed_code(&self) -> DomainResult<HashedCode>;

    /// Check a plaintext value against a stored hash
    async fn verify(&self, plaintext: &str, hash: &str) -> DomainResult<bool>;

    /// Hash a secret (e.g. a new password) for storage
    async fn encrypt_secret(&self, secret: &str) -> DomainResult<String>;
}

/// bcrypt with a configurable cost. Hashing runs on the blocking pool so it
/// never stalls the async workers.
#[derive(Debug, Clone)]
pub struct BcryptCredentialService {
    cost: u32,
}

impl Default for BcryptCredentialService {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl BcryptCredentialService {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Generate a 6-digit code from the OS CSPRNG
    pub fn generate_secure_code() -> String {
        let code: u32 = OsRng.gen_range(0..1_000_000);
        format!("{:0width$}", code, width = CODE_LENGTH)
    }

    async fn hash(&self, value: String) -> DomainResult<String> {
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(value, cost))
            .await
            .map_err(|e| DomainError::internal(format!("Hashing task failed: {}", e)))?
            .map_err(|e| DomainError::internal(format!("Failed to hash secret: {}", e)))
    }
}

#[async_trait]
impl CredentialService for BcryptCredentialService {
    async fn generate_hashed_code(&self) -> DomainResult<HashedCode> {
        let plaintext = Self::generate_secure_code();
        let hash = self.hash(plaintext.clone()).await?;
        Ok(HashedCode { plaintext, hash })
    }

    async fn verify(&self, plaintext: &str, hash: &str) -> DomainResult<bool> {
        let plaintext = plaintext.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &hash))
            .await
            .map_err(|e| DomainError::internal(format!("Verification task failed: {}", e)))?
            .map_err(|e| DomainError::internal(format!("Stored hash is unreadable: {}", e)))
    }

    async fn encrypt_secret(&self, secret: &str) -> DomainResult<String> {
        self.hash(secret.to_string()).await
    }
}
