//! Subject repository trait.
//!
//! One implementation instance backs each of the three subject stores
//! (admins, tenants, users); [`super::SubjectDirectory`] picks the right one
//! for a [`UserType`](crate::domain::entities::subject::UserType).

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::subject::{Category, Subject};
use crate::errors::DomainError;

/// Repository trait for subject persistence operations
#[async_trait]
pub trait SubjectRepository: Send + Sync {
    /// Find a subject by its unique identifier
    ///
    /// # Returns
    /// * `Ok(Some(Subject))` - Subject found
    /// * `Ok(None)` - No subject with this id in this store
    /// * `Err(DomainError)` - Storage error
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Subject>, DomainError>;

    /// Find a subject by its (normalized) e-mail address
    async fn find_by_email(&self, email: &str) -> Result<Option<Subject>, DomainError>;

    /// Persist a new subject
    async fn create(&self, subject: Subject) -> Result<Subject, DomainError>;

    /// Record `value` as the verified destination for `category`
    ///
    /// # Returns
    /// * `Err(DomainError::NotFound)` - No subject with this id
    async fn set_channel(
        &self,
        id: Uuid,
        category: Category,
        value: &str,
    ) -> Result<(), DomainError>;

    /// Replace the stored password hash
    ///
    /// # Returns
    /// * `Err(DomainError::NotFound)` - No subject with this id
    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> Result<(), DomainError>;
}
