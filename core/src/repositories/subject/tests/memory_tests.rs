use uuid::Uuid;

use crate::domain::entities::subject::{Category, Subject, UserType};
use crate::errors::DomainError;
use crate::repositories::subject::{InMemorySubjectRepository, SubjectDirectory, SubjectRepository};

#[tokio::test]
async fn test_create_and_find() {
    let repo = InMemorySubjectRepository::new(UserType::Tenant);
    let mut subject = Subject::new_bare(UserType::Tenant);
    subject.email = Some("owner@shop.io".to_string());

    let created = repo.create(subject.clone()).await.unwrap();
    assert_eq!(created.id, subject.id);
    assert_eq!(repo.len().await, 1);

    let by_id = repo.find_by_id(subject.id).await.unwrap().unwrap();
    assert_eq!(by_id.email.as_deref(), Some("owner@shop.io"));

    let by_email = repo.find_by_email("owner@shop.io").await.unwrap();
    assert_eq!(by_email.map(|s| s.id), Some(subject.id));
    assert!(repo.find_by_email("other@shop.io").await.unwrap().is_none());
}

#[tokio::test]
async fn test_store_rejects_other_user_types() {
    let repo = InMemorySubjectRepository::new(UserType::Admin);
    let result = repo.create(Subject::new_bare(UserType::User)).await;
    assert!(matches!(result, Err(DomainError::Internal { .. })));
}

#[tokio::test]
async fn test_set_channel_and_password() {
    let repo = InMemorySubjectRepository::new(UserType::User);
    let subject = repo.create(Subject::new_bare(UserType::User)).await.unwrap();

    repo.set_channel(subject.id, Category::PhoneNo, "+14155552671")
        .await
        .unwrap();
    repo.set_password_hash(subject.id, "hash").await.unwrap();

    let stored = repo.find_by_id(subject.id).await.unwrap().unwrap();
    assert_eq!(stored.phone_no.as_deref(), Some("+14155552671"));
    assert_eq!(stored.password_hash.as_deref(), Some("hash"));
}

#[tokio::test]
async fn test_updates_on_missing_subject_are_not_found() {
    let repo = InMemorySubjectRepository::new(UserType::User);
    let id = Uuid::new_v4();

    let result = repo.set_channel(id, Category::Email, "a@b.io").await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));

    let result = repo.set_password_hash(id, "hash").await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_directory_keeps_stores_disjoint() {
    let directory = SubjectDirectory::in_memory();
    let admin = directory
        .for_type(UserType::Admin)
        .create(Subject::new_bare(UserType::Admin))
        .await
        .unwrap();

    assert!(directory
        .for_type(UserType::Admin)
        .find_by_id(admin.id)
        .await
        .unwrap()
        .is_some());
    assert!(directory
        .for_type(UserType::Tenant)
        .find_by_id(admin.id)
        .await
        .unwrap()
        .is_none());
}
