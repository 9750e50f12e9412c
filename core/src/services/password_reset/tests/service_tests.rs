use std::sync::Arc;

use crate::domain::entities::reset_token::PasswordResetClaims;
use crate::domain::entities::subject::{Subject, UserType};
use crate::errors::{DomainError, TokenError};
use crate::repositories::SubjectDirectory;
use crate::services::notification::RecordingNotificationDispatcher;
use crate::services::otp::tests::mocks::FakeCredentialService;
use crate::services::password_reset::{
    JwtResetTokenSigner, PasswordResetConfig, PasswordResetService, ResetTokenSigner,
};

const EMAIL: &str = "admin@moreshop.io";
const NEW_PASSWORD: &str = "N3w!password";

struct ResetHarness {
    service: PasswordResetService,
    subjects: SubjectDirectory,
    notifier: Arc<RecordingNotificationDispatcher>,
    signer: Arc<JwtResetTokenSigner>,
    subject: Subject,
}

async fn harness() -> ResetHarness {
    let subjects = SubjectDirectory::in_memory();
    let notifier = Arc::new(RecordingNotificationDispatcher::new());
    let config = PasswordResetConfig {
        frontend_url: "https://admin.moreshop.io".to_string(),
        ..Default::default()
    };
    let signer = Arc::new(JwtResetTokenSigner::new(
        "test-secret",
        &config.issuer,
        &config.audience,
    ));

    let mut subject = Subject::new_bare(UserType::Admin);
    subject.email = Some(EMAIL.to_string());
    subject.role_id = Some("super-admin".to_string());
    subject.password_hash = Some(FakeCredentialService::hash_of("Old!passw0rd"));
    subjects
        .for_type(UserType::Admin)
        .create(subject.clone())
        .await
        .unwrap();

    let service = PasswordResetService::new(
        subjects.clone(),
        Arc::new(FakeCredentialService::new()),
        notifier.clone(),
        signer.clone(),
        config,
    );

    ResetHarness {
        service,
        subjects,
        notifier,
        signer,
        subject,
    }
}

fn token_from_link(link: &str) -> String {
    link.split("resetToken=").nth(1).unwrap().to_string()
}

async fn emailed_token(h: &ResetHarness) -> String {
    h.service.create_link(EMAIL, UserType::Admin).await.unwrap();
    let link = h.notifier.last_reset_link_for(EMAIL).unwrap();
    token_from_link(&link)
}

#[tokio::test]
async fn test_create_link_emails_signed_link() {
    let h = harness().await;
    h.service
        .create_link(" Admin@MoreShop.io ", UserType::Admin)
        .await
        .unwrap();

    let link = h.notifier.last_reset_link_for(EMAIL).unwrap();
    assert!(link.starts_with("https://admin.moreshop.io/reset-password?resetToken="));

    let claims = h.signer.decode(&token_from_link(&link)).unwrap();
    assert_eq!(claims.subject_id(), Some(h.subject.id));
    assert_eq!(claims.user_type, UserType::Admin);
    assert_eq!(claims.role_id.as_deref(), Some("super-admin"));
    assert_eq!(claims.exp - claims.iat, 15 * 60);
}

#[tokio::test]
async fn test_create_link_unknown_email_is_not_found() {
    let h = harness().await;

    let result = h.service.create_link("nobody@moreshop.io", UserType::Admin).await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));

    // Stores are disjoint: the admin's address is unknown to tenants.
    let result = h.service.create_link(EMAIL, UserType::Tenant).await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));
    assert_eq!(h.notifier.sent_count(), 0);
}

#[tokio::test]
async fn test_create_link_invalid_email_is_validation_error() {
    let h = harness().await;
    let result = h.service.create_link("admin", UserType::Admin).await;
    assert!(matches!(result, Err(DomainError::Validation { .. })));
}

#[tokio::test]
async fn test_create_link_delivery_failure() {
    let h = harness().await;
    h.notifier.set_failing(true);
    let result = h.service.create_link(EMAIL, UserType::Admin).await;
    assert!(matches!(result, Err(DomainError::NotificationFailed { .. })));
}

#[tokio::test]
async fn test_reset_password_updates_hash() {
    let h = harness().await;
    let token = emailed_token(&h).await;

    let subject_id = h.service.reset_password(&token, NEW_PASSWORD).await.unwrap();
    assert_eq!(subject_id, h.subject.id);

    let stored = h
        .subjects
        .for_type(UserType::Admin)
        .find_by_id(subject_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        stored.password_hash,
        Some(FakeCredentialService::hash_of(NEW_PASSWORD))
    );
}

#[tokio::test]
async fn test_reset_link_is_single_use() {
    let h = harness().await;
    let first = emailed_token(&h).await;
    let second = emailed_token(&h).await;

    h.service.reset_password(&first, NEW_PASSWORD).await.unwrap();

    let reused = h.service.reset_password(&first, "An0ther!pass").await;
    assert!(matches!(
        reused,
        Err(DomainError::Token(TokenError::TokenRevoked))
    ));

    // Links issued before the reset die with it.
    let older = h.service.reset_password(&second, "An0ther!pass").await;
    assert!(matches!(
        older,
        Err(DomainError::Token(TokenError::TokenRevoked))
    ));
}

#[tokio::test]
async fn test_reset_with_weak_password_keeps_link_usable() {
    let h = harness().await;
    let token = emailed_token(&h).await;

    let weak = h.service.reset_password(&token, "password").await;
    match weak {
        Err(DomainError::Validation { message }) => {
            assert!(message.contains("uppercase"));
            assert!(message.contains("digit"));
        }
        other => panic!("expected validation error, got {:?}", other),
    }

    h.service.reset_password(&token, NEW_PASSWORD).await.unwrap();
}

#[tokio::test]
async fn test_reset_with_bad_tokens() {
    let h = harness().await;

    let garbage = h.service.reset_password("garbage", NEW_PASSWORD).await;
    assert!(matches!(
        garbage,
        Err(DomainError::Token(TokenError::InvalidToken))
    ));

    let expired_claims = PasswordResetClaims::for_subject(
        &h.subject,
        -60,
        &PasswordResetConfig::default().issuer,
        &PasswordResetConfig::default().audience,
    );
    let expired = h.signer.sign(&expired_claims).unwrap();
    let result = h.service.reset_password(&expired, NEW_PASSWORD).await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::TokenExpired))
    ));

    let forged = JwtResetTokenSigner::new(
        "attacker-secret",
        &PasswordResetConfig::default().issuer,
        &PasswordResetConfig::default().audience,
    )
    .sign(&PasswordResetClaims::for_subject(
        &h.subject,
        15,
        &PasswordResetConfig::default().issuer,
        &PasswordResetConfig::default().audience,
    ))
    .unwrap();
    let result = h.service.reset_password(&forged, NEW_PASSWORD).await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidToken))
    ));
}

#[tokio::test]
async fn test_reset_for_deleted_subject_is_not_found() {
    let h = harness().await;
    let ghost = Subject::new_bare(UserType::Admin);
    let claims = PasswordResetClaims::for_subject(
        &ghost,
        15,
        &PasswordResetConfig::default().issuer,
        &PasswordResetConfig::default().audience,
    );
    let token = h.signer.sign(&claims).unwrap();

    let result = h.service.reset_password(&token, NEW_PASSWORD).await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}
