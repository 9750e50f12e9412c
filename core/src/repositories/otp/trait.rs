//! OTP record repository trait.
//!
//! Implementations must make each operation atomic with respect to the
//! `(user_id, user_type, category)` key: concurrent callers never observe
//! two records for one key, and a conditional write never acts on a record
//! another caller replaced in between.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::otp_record::{OtpKey, OtpRecord};
use crate::errors::DomainError;

/// Result of [`OtpRepository::insert_or_keep`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueWrite {
    /// No record existed; the new one was stored
    Created(OtpRecord),
    /// An expired record, or one for a different destination, was overwritten
    Replaced {
        record: OtpRecord,
        previous: OtpRecord,
    },
    /// A live record for the same destination exists and was left alone
    Kept(OtpRecord),
}

impl IssueWrite {
    /// Whether the candidate record is now the stored one
    pub fn is_written(&self) -> bool {
        !matches!(self, IssueWrite::Kept(_))
    }
}

#[async_trait]
pub trait OtpRepository: Send + Sync {
    /// Fetch the record for a key, expired or not
    async fn find(&self, key: &OtpKey) -> Result<Option<OtpRecord>, DomainError>;

    /// Store `record` unless a record live at `now` exists for the same key
    /// and the same destination
    async fn insert_or_keep(
        &self,
        record: OtpRecord,
        now: DateTime<Utc>,
    ) -> Result<IssueWrite, DomainError>;

    /// Store `record` unconditionally, returning whatever it displaced
    async fn replace(&self, record: OtpRecord) -> Result<Option<OtpRecord>, DomainError>;

    /// Delete the record for `key` only if its id is still `record_id`
    ///
    /// # Returns
    /// * `Ok(true)` - This call removed the record
    /// * `Ok(false)` - Already gone or replaced by a newer record
    async fn delete_if_current(&self, key: &OtpKey, record_id: Uuid) -> Result<bool, DomainError>;

    /// Count a wrong guess against the record for `key`, only if its id is
    /// still `record_id`
    ///
    /// # Returns
    /// * `Ok(Some(n))` - The record's attempt count after this guess
    /// * `Ok(None)` - Already gone or replaced by a newer record
    async fn record_failed_attempt(
        &self,
        key: &OtpKey,
        record_id: Uuid,
    ) -> Result<Option<u32>, DomainError>;

    /// Put `record` back only if nothing is stored for its key
    ///
    /// Returns whether the record was stored.
    async fn insert_if_absent(&self, record: OtpRecord) -> Result<bool, DomainError>;

    /// Remove every record expired at `now`, returning how many were removed
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError>;
}
