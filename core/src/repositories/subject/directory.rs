//! Routing from [`UserType`] to the subject store that holds it.

use std::sync::Arc;

use crate::domain::entities::subject::UserType;

use super::memory::InMemorySubjectRepository;
use super::trait_::SubjectRepository;

/// The three subject stores, addressed by user type
#[derive(Clone)]
pub struct SubjectDirectory {
    admins: Arc<dyn SubjectRepository>,
    tenants: Arc<dyn SubjectRepository>,
    users: Arc<dyn SubjectRepository>,
}

impl SubjectDirectory {
    pub fn new(
        admins: Arc<dyn SubjectRepository>,
        tenants: Arc<dyn SubjectRepository>,
        users: Arc<dyn SubjectRepository>,
    ) -> Self {
        Self {
            admins,
            tenants,
            users,
        }
    }

    /// Directory backed by three empty in-memory stores
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemorySubjectRepository::new(UserType::Admin)),
            Arc::new(InMemorySubjectRepository::new(UserType::Tenant)),
            Arc::new(InMemorySubjectRepository::new(UserType::User)),
        )
    }

    pub fn for_type(&self, user_type: UserType) -> &dyn SubjectRepository {
        match user_type {
            UserType::Admin => self.admins.as_ref(),
            UserType::Tenant => self.tenants.as_ref(),
            UserType::User => self.users.as_ref(),
        }
    }
}
