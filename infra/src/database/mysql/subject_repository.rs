//! MySQL implementation of the SubjectRepository trait.
//!
//! Each instance is bound to one of the `admins`, `tenants` or `users`
//! tables; all three share the same column layout.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use ms_core::domain::entities::subject::{Category, Subject, UserType};
use ms_core::errors::DomainError;
use ms_core::repositories::SubjectRepository;

use super::{db_error, parse_uuid};

const SUBJECT_COLUMNS: &str =
    "id, email, phone_no, password_hash, role_id, created_at, updated_at";

/// MySQL implementation of SubjectRepository for a single user type
pub struct MySqlSubjectRepository {
    pool: MySqlPool,
    user_type: UserType,
    table: &'static str,
}

impl MySqlSubjectRepository {
    /// Create a repository over the table that stores `user_type`
    pub fn new(pool: MySqlPool, user_type: UserType) -> Self {
        Self {
            pool,
            user_type,
            table: Self::table_for(user_type),
        }
    }

    pub fn table_for(user_type: UserType) -> &'static str {
        match user_type {
            UserType::Admin => "admins",
            UserType::Tenant => "tenants",
            UserType::User => "users",
        }
    }

    fn row_to_subject(&self, row: &sqlx::mysql::MySqlRow) -> Result<Subject, DomainError> {
        let get = |e: sqlx::Error| db_error("Failed to read subject row", e);

        let id: String = row.try_get("id").map_err(get)?;
        Ok(Subject {
            id: parse_uuid("id", &id)?,
            user_type: self.user_type,
            email: row.try_get("email").map_err(get)?,
            phone_no: row.try_get("phone_no").map_err(get)?,
            password_hash: row.try_get("password_hash").map_err(get)?,
            role_id: row.try_get("role_id").map_err(get)?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at").map_err(get)?,
            updated_at: row.try_get::<DateTime<Utc>, _>("updated_at").map_err(get)?,
        })
    }

    fn missing(&self, id: Uuid) -> DomainError {
        DomainError::not_found(format!("{} {}", self.user_type, id))
    }
}

#[async_trait]
impl SubjectRepository for MySqlSubjectRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Subject>, DomainError> {
        let query = format!("SELECT {} FROM {} WHERE id = ?", SUBJECT_COLUMNS, self.table);
        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find subject by id", e))?;

        row.map(|r| self.row_to_subject(&r)).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Subject>, DomainError> {
        let query = format!(
            "SELECT {} FROM {} WHERE email = ? LIMIT 1",
            SUBJECT_COLUMNS, self.table
        );
        let row = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find subject by email", e))?;

        row.map(|r| self.row_to_subject(&r)).transpose()
    }

    async fn create(&self, subject: Subject) -> Result<Subject, DomainError> {
        if subject.user_type != self.user_type {
            return Err(DomainError::internal(format!(
                "cannot store {} in the {} table",
                subject.user_type, self.table
            )));
        }

        let query = format!(
            "INSERT INTO {} ({}) VALUES (?, ?, ?, ?, ?, ?, ?)",
            self.table, SUBJECT_COLUMNS
        );
        sqlx::query(&query)
            .bind(subject.id.to_string())
            .bind(&subject.email)
            .bind(&subject.phone_no)
            .bind(&subject.password_hash)
            .bind(&subject.role_id)
            .bind(subject.created_at)
            .bind(subject.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to create subject", e))?;

        tracing::debug!(
            subject_id = %subject.id,
            user_type = %self.user_type,
            event = "subject_created",
            "Bare subject created"
        );

        Ok(subject)
    }

    async fn set_channel(
        &self,
        id: Uuid,
        category: Category,
        value: &str,
    ) -> Result<(), DomainError> {
        let query = format!(
            "UPDATE {} SET {} = ?, updated_at = ? WHERE id = ?",
            self.table,
            category.column()
        );
        let result = sqlx::query(&query)
            .bind(value)
            .bind(Utc::now())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to set subject channel", e))?;

        if result.rows_affected() == 0 {
            return Err(self.missing(id));
        }
        Ok(())
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> Result<(), DomainError> {
        let query = format!(
            "UPDATE {} SET password_hash = ?, updated_at = ? WHERE id = ?",
            self.table
        );
        let result = sqlx::query(&query)
            .bind(password_hash)
            .bind(Utc::now())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to update password hash", e))?;

        if result.rows_affected() == 0 {
            return Err(self.missing(id));
        }
        Ok(())
    }
}
