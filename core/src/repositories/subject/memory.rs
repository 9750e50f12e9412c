//! In-memory subject store for tests and local development

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::subject::{Category, Subject, UserType};
use crate::errors::DomainError;

use super::trait_::SubjectRepository;

/// Subject store holding a single user type
pub struct InMemorySubjectRepository {
    user_type: UserType,
    subjects: Arc<RwLock<HashMap<Uuid, Subject>>>,
}

impl InMemorySubjectRepository {
    pub fn new(user_type: UserType) -> Self {
        Self {
            user_type,
            subjects: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn user_type(&self) -> UserType {
        self.user_type
    }

    pub async fn len(&self) -> usize {
        self.subjects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.subjects.read().await.is_empty()
    }

    fn missing(&self, id: Uuid) -> DomainError {
        DomainError::not_found(format!("{} {}", self.user_type, id))
    }
}

#[async_trait]
impl SubjectRepository for InMemorySubjectRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Subject>, DomainError> {
        let subjects = self.subjects.read().await;
        Ok(subjects.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Subject>, DomainError> {
        let subjects = self.subjects.read().await;
        Ok(subjects
            .values()
            .find(|s| s.email.as_deref() == Some(email))
            .cloned())
    }

    async fn create(&self, subject: Subject) -> Result<Subject, DomainError> {
        if subject.user_type != self.user_type {
            return Err(DomainError::internal(format!(
                "cannot store {} in the {} store",
                subject.user_type, self.user_type
            )));
        }

        let mut subjects = self.subjects.write().await;
        if subjects.contains_key(&subject.id) {
            return Err(DomainError::validation("Subject already exists"));
        }

        subjects.insert(subject.id, subject.clone());
        Ok(subject)
    }

    async fn set_channel(
        &self,
        id: Uuid,
        category: Category,
        value: &str,
    ) -> Result<(), DomainError> {
        let mut subjects = self.subjects.write().await;
        let subject = subjects.get_mut(&id).ok_or_else(|| self.missing(id))?;
        subject.set_channel(category, value);
        Ok(())
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> Result<(), DomainError> {
        let mut subjects = self.subjects.write().await;
        let subject = subjects.get_mut(&id).ok_or_else(|| self.missing(id))?;
        subject.set_password_hash(password_hash);
        Ok(())
    }
}
