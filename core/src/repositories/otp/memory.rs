//! In-memory OTP store for tests and local development

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::otp_record::{OtpKey, OtpRecord};
use crate::errors::DomainError;

use super::trait_::{IssueWrite, OtpRepository};

/// OTP store keyed by `(user_id, user_type, category)`. The write lock is
/// held for the whole of every conditional write.
#[derive(Default)]
pub struct InMemoryOtpRepository {
    records: Arc<RwLock<HashMap<OtpKey, OtpRecord>>>,
}

impl InMemoryOtpRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl OtpRepository for InMemoryOtpRepository {
    async fn find(&self, key: &OtpKey) -> Result<Option<OtpRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records.get(key).cloned())
    }

    async fn insert_or_keep(
        &self,
        record: OtpRecord,
        now: DateTime<Utc>,
    ) -> Result<IssueWrite, DomainError> {
        let mut records = self.records.write().await;
        let key = record.key();

        let kept = records
            .get(&key)
            .filter(|existing| existing.is_live_for(&record.otp_for, now))
            .cloned();
        if let Some(existing) = kept {
            return Ok(IssueWrite::Kept(existing));
        }

        match records.insert(key, record.clone()) {
            Some(previous) => Ok(IssueWrite::Replaced { record, previous }),
            None => Ok(IssueWrite::Created(record)),
        }
    }

    async fn replace(&self, record: OtpRecord) -> Result<Option<OtpRecord>, DomainError> {
        let mut records = self.records.write().await;
        Ok(records.insert(record.key(), record))
    }

    async fn delete_if_current(&self, key: &OtpKey, record_id: Uuid) -> Result<bool, DomainError> {
        let mut records = self.records.write().await;
        let is_current = records.get(key).is_some_and(|current| current.id == record_id);
        if is_current {
            records.remove(key);
        }
        Ok(is_current)
    }

    async fn record_failed_attempt(
        &self,
        key: &OtpKey,
        record_id: Uuid,
    ) -> Result<Option<u32>, DomainError> {
        let mut records = self.records.write().await;
        Ok(records
            .get_mut(key)
            .filter(|current| current.id == record_id)
            .map(|current| {
                current.attempts += 1;
                current.attempts
            }))
    }

    async fn insert_if_absent(&self, record: OtpRecord) -> Result<bool, DomainError> {
        let mut records = self.records.write().await;
        match records.entry(record.key()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(true)
            }
        }
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, record| !record.is_expired_at(now));
        Ok((before - records.len()) as u64)
    }
}
