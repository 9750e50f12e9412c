//! Stored one-time passcodes.

use chrono::{DateTime, Duration, Utc};
use std::fmt;
use uuid::Uuid;

use super::subject::{Category, UserType};

/// Default lifetime of an issued code
pub const DEFAULT_EXPIRATION_MINUTES: i64 = 10;

/// Length of the plaintext code
pub const CODE_LENGTH: usize = 6;

/// Wrong guesses a single code tolerates before it is discarded
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Identity of an OTP record: at most one record exists per key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OtpKey {
    pub user_id: Uuid,
    pub user_type: UserType,
    pub category: Category,
}

impl OtpKey {
    pub fn new(user_id: Uuid, user_type: UserType, category: Category) -> Self {
        Self {
            user_id,
            user_type,
            category,
        }
    }
}

/// A pending OTP challenge. `otp_hash` is a bcrypt hash; the plaintext
/// code is never stored.
#[derive(Clone, PartialEq, Eq)]
pub struct OtpRecord {
    /// Fresh for every write, so a replaced record never matches its predecessor
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_type: UserType,
    pub category: Category,
    pub otp_hash: String,
    /// Destination the code was sent to
    pub otp_for: String,
    /// Wrong guesses made against this code so far
    pub attempts: u32,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl OtpRecord {
    pub fn new(
        key: OtpKey,
        otp_hash: String,
        otp_for: impl Into<String>,
        expiration_minutes: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: key.user_id,
            user_type: key.user_type,
            category: key.category,
            otp_hash,
            otp_for: otp_for.into(),
            attempts: 0,
            created_at: now,
            expires_at: now + Duration::minutes(expiration_minutes),
        }
    }

    pub fn key(&self) -> OtpKey {
        OtpKey::new(self.user_id, self.user_type, self.category)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_exhausted(&self, max_attempts: u32) -> bool {
        self.attempts >= max_attempts
    }

    /// Live and issued for the same destination
    pub fn is_live_for(&self, destination: &str, now: DateTime<Utc>) -> bool {
        !self.is_expired_at(now) && self.otp_for == destination
    }
}

impl fmt::Debug for OtpRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OtpRecord")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("user_type", &self.user_type)
            .field("category", &self.category)
            .field("otp_hash", &"[redacted]")
            .field("attempts", &self.attempts)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
