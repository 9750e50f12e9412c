//! Test doubles for the OTP and password reset services

use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::subject::{Category, Subject, UserType};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::{
    InMemoryOtpRepository, InMemorySubjectRepository, SubjectDirectory, SubjectRepository,
};
use crate::services::credential::{CredentialService, HashedCode};
use crate::services::notification::RecordingNotificationDispatcher;
use crate::services::otp::{OtpService, OtpServiceConfig};

/// Deterministic, instant credential service: codes count up from 100000
/// and "hashes" are a prefixed copy of the input
pub struct FakeCredentialService {
    counter: AtomicU32,
}

impl FakeCredentialService {
    pub fn new() -> Self {
        Self {
            counter: AtomicU32::new(100_000),
        }
    }

    pub fn hash_of(value: &str) -> String {
        format!("fake${}", value)
    }
}

#[async_trait]
impl CredentialService for FakeCredentialService {
    async fn generate_hashed_code(&self) -> DomainResult<HashedCode> {
        let plaintext = self.counter.fetch_add(1, Ordering::SeqCst).to_string();
        Ok(HashedCode {
            hash: Self::hash_of(&plaintext),
            plaintext,
        })
    }

    async fn verify(&self, plaintext: &str, hash: &str) -> DomainResult<bool> {
        Ok(Self::hash_of(plaintext) == hash)
    }

    async fn encrypt_secret(&self, secret: &str) -> DomainResult<String> {
        Ok(Self::hash_of(secret))
    }
}

/// Subject store whose channel updates fail a set number of times before
/// reaching the in-memory store
pub struct FlakySubjectRepository {
    inner: InMemorySubjectRepository,
    failures_left: AtomicU32,
}

impl FlakySubjectRepository {
    pub fn new(user_type: UserType, failures: u32) -> Self {
        Self {
            inner: InMemorySubjectRepository::new(user_type),
            failures_left: AtomicU32::new(failures),
        }
    }
}

#[async_trait]
impl SubjectRepository for FlakySubjectRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Subject>> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Subject>> {
        self.inner.find_by_email(email).await
    }

    async fn create(&self, subject: Subject) -> DomainResult<Subject> {
        self.inner.create(subject).await
    }

    async fn set_channel(&self, id: Uuid, category: Category, value: &str) -> DomainResult<()> {
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(DomainError::internal("transient database error"));
        }
        self.inner.set_channel(id, category, value).await
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> DomainResult<()> {
        self.inner.set_password_hash(id, password_hash).await
    }
}

pub struct OtpHarness {
    pub service: Arc<OtpService>,
    pub subjects: SubjectDirectory,
    pub otps: Arc<InMemoryOtpRepository>,
    pub notifier: Arc<RecordingNotificationDispatcher>,
}

pub fn otp_harness_with(credentials: Arc<dyn CredentialService>) -> OtpHarness {
    otp_harness_over(SubjectDirectory::in_memory(), credentials)
}

/// Tenants whose channel updates fail `failures` times
pub fn otp_harness_with_flaky_tenants(failures: u32) -> OtpHarness {
    let subjects = SubjectDirectory::new(
        Arc::new(InMemorySubjectRepository::new(UserType::Admin)),
        Arc::new(FlakySubjectRepository::new(UserType::Tenant, failures)),
        Arc::new(InMemorySubjectRepository::new(UserType::User)),
    );
    otp_harness_over(subjects, Arc::new(FakeCredentialService::new()))
}

fn otp_harness_over(
    subjects: SubjectDirectory,
    credentials: Arc<dyn CredentialService>,
) -> OtpHarness {
    let otps = Arc::new(InMemoryOtpRepository::new());
    let notifier = Arc::new(RecordingNotificationDispatcher::new());

    let service = OtpService::new(
        subjects.clone(),
        otps.clone(),
        credentials,
        notifier.clone(),
        OtpServiceConfig::default(),
    );

    OtpHarness {
        service: Arc::new(service),
        subjects,
        otps,
        notifier,
    }
}

pub fn otp_harness() -> OtpHarness {
    otp_harness_with(Arc::new(FakeCredentialService::new()))
}
