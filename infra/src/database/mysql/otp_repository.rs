//! MySQL implementation of the OtpRepository trait.
//!
//! The `otp_records` table carries a unique key on
//! `(user_id, user_type, category)`. Conditional writes start with
//! `INSERT ... ON DUPLICATE KEY UPDATE id = id`, which either stores the new
//! record or leaves the existing one untouched while taking its row lock,
//! and then decide inside the same transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySql, MySqlPool, Row, Transaction};
use uuid::Uuid;

use ms_core::domain::entities::otp_record::{OtpKey, OtpRecord};
use ms_core::errors::DomainError;
use ms_core::repositories::{IssueWrite, OtpRepository};

use super::{db_error, parse_uuid};

const OTP_COLUMNS: &str =
    "id, user_id, user_type, category, otp_hash, otp_for, attempts, created_at, expires_at";

/// MySQL implementation of OtpRepository
pub struct MySqlOtpRepository {
    pool: MySqlPool,
}

impl MySqlOtpRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> Result<OtpRecord, DomainError> {
        let get = |e: sqlx::Error| db_error("Failed to read OTP row", e);

        let id: String = row.try_get("id").map_err(get)?;
        let user_id: String = row.try_get("user_id").map_err(get)?;
        let user_type: String = row.try_get("user_type").map_err(get)?;
        let category: String = row.try_get("category").map_err(get)?;

        Ok(OtpRecord {
            id: parse_uuid("id", &id)?,
            user_id: parse_uuid("user_id", &user_id)?,
            user_type: user_type.parse().map_err(DomainError::internal)?,
            category: category.parse().map_err(DomainError::internal)?,
            otp_hash: row.try_get("otp_hash").map_err(get)?,
            otp_for: row.try_get("otp_for").map_err(get)?,
            attempts: row.try_get::<u32, _>("attempts").map_err(get)?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at").map_err(get)?,
            expires_at: row.try_get::<DateTime<Utc>, _>("expires_at").map_err(get)?,
        })
    }

    fn bind_insert<'q>(
        query: sqlx::query::Query<'q, MySql, sqlx::mysql::MySqlArguments>,
        record: &'q OtpRecord,
    ) -> sqlx::query::Query<'q, MySql, sqlx::mysql::MySqlArguments> {
        query
            .bind(record.id.to_string())
            .bind(record.user_id.to_string())
            .bind(record.user_type.as_str())
            .bind(record.category.as_str())
            .bind(&record.otp_hash)
            .bind(&record.otp_for)
            .bind(record.attempts)
            .bind(record.created_at)
            .bind(record.expires_at)
    }

    /// Insert `record` unless its key is taken, then return the row now
    /// stored for the key with its lock held until `tx` ends
    async fn claim_key(
        tx: &mut Transaction<'static, MySql>,
        record: &OtpRecord,
    ) -> Result<OtpRecord, DomainError> {
        let insert = format!(
            "INSERT INTO otp_records ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) \
             ON DUPLICATE KEY UPDATE id = id",
            OTP_COLUMNS
        );
        Self::bind_insert(sqlx::query(&insert), record)
            .execute(&mut **tx)
            .await
            .map_err(|e| db_error("Failed to insert OTP record", e))?;

        let select = format!(
            "SELECT {} FROM otp_records \
             WHERE user_id = ? AND user_type = ? AND category = ? FOR UPDATE",
            OTP_COLUMNS
        );
        let row = sqlx::query(&select)
            .bind(record.user_id.to_string())
            .bind(record.user_type.as_str())
            .bind(record.category.as_str())
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| db_error("Failed to lock OTP record", e))?;

        Self::row_to_record(&row)
    }

    /// Overwrite the locked row for the record's key
    async fn overwrite(
        tx: &mut Transaction<'static, MySql>,
        record: &OtpRecord,
    ) -> Result<(), DomainError> {
        sqlx::query(
            "UPDATE otp_records \
             SET id = ?, otp_hash = ?, otp_for = ?, attempts = ?, created_at = ?, expires_at = ? \
             WHERE user_id = ? AND user_type = ? AND category = ?",
        )
        .bind(record.id.to_string())
        .bind(&record.otp_hash)
        .bind(&record.otp_for)
        .bind(record.attempts)
        .bind(record.created_at)
        .bind(record.expires_at)
        .bind(record.user_id.to_string())
        .bind(record.user_type.as_str())
        .bind(record.category.as_str())
        .execute(&mut **tx)
        .await
        .map_err(|e| db_error("Failed to replace OTP record", e))?;
        Ok(())
    }

    async fn begin(&self) -> Result<Transaction<'static, MySql>, DomainError> {
        self.pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))
    }

    async fn commit(tx: Transaction<'static, MySql>) -> Result<(), DomainError> {
        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit transaction", e))
    }
}

#[async_trait]
impl OtpRepository for MySqlOtpRepository {
    async fn find(&self, key: &OtpKey) -> Result<Option<OtpRecord>, DomainError> {
        let query = format!(
            "SELECT {} FROM otp_records WHERE user_id = ? AND user_type = ? AND category = ?",
            OTP_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(key.user_id.to_string())
            .bind(key.user_type.as_str())
            .bind(key.category.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find OTP record", e))?;

        row.map(|r| Self::row_to_record(&r)).transpose()
    }

    async fn insert_or_keep(
        &self,
        record: OtpRecord,
        now: DateTime<Utc>,
    ) -> Result<IssueWrite, DomainError> {
        let mut tx = self.begin().await?;
        let stored = Self::claim_key(&mut tx, &record).await?;

        let outcome = if stored.id == record.id {
            IssueWrite::Created(record)
        } else if stored.is_live_for(&record.otp_for, now) {
            IssueWrite::Kept(stored)
        } else {
            Self::overwrite(&mut tx, &record).await?;
            IssueWrite::Replaced {
                record,
                previous: stored,
            }
        };

        Self::commit(tx).await?;
        Ok(outcome)
    }

    async fn replace(&self, record: OtpRecord) -> Result<Option<OtpRecord>, DomainError> {
        let mut tx = self.begin().await?;
        let stored = Self::claim_key(&mut tx, &record).await?;

        let previous = if stored.id == record.id {
            None
        } else {
            Self::overwrite(&mut tx, &record).await?;
            Some(stored)
        };

        Self::commit(tx).await?;
        Ok(previous)
    }

    async fn delete_if_current(&self, key: &OtpKey, record_id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "DELETE FROM otp_records \
             WHERE user_id = ? AND user_type = ? AND category = ? AND id = ?",
        )
        .bind(key.user_id.to_string())
        .bind(key.user_type.as_str())
        .bind(key.category.as_str())
        .bind(record_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to delete OTP record", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn record_failed_attempt(
        &self,
        key: &OtpKey,
        record_id: Uuid,
    ) -> Result<Option<u32>, DomainError> {
        let mut tx = self.begin().await?;

        let row = sqlx::query(
            "SELECT attempts FROM otp_records \
             WHERE user_id = ? AND user_type = ? AND category = ? AND id = ? FOR UPDATE",
        )
        .bind(key.user_id.to_string())
        .bind(key.user_type.as_str())
        .bind(key.category.as_str())
        .bind(record_id.to_string())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to lock OTP record", e))?;

        let Some(row) = row else {
            Self::commit(tx).await?;
            return Ok(None);
        };
        let attempts = row
            .try_get::<u32, _>("attempts")
            .map_err(|e| db_error("Failed to read OTP row", e))?
            .saturating_add(1);

        sqlx::query("UPDATE otp_records SET attempts = ? WHERE id = ?")
            .bind(attempts)
            .bind(record_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to count OTP attempt", e))?;

        Self::commit(tx).await?;
        Ok(Some(attempts))
    }

    async fn insert_if_absent(&self, record: OtpRecord) -> Result<bool, DomainError> {
        let insert = format!(
            "INSERT IGNORE INTO otp_records ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            OTP_COLUMNS
        );
        let result = Self::bind_insert(sqlx::query(&insert), &record)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to restore OTP record", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM otp_records WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to purge expired OTP records", e))?;

        Ok(result.rows_affected())
    }
}
