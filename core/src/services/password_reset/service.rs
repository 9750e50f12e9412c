//! Password reset service implementation

use constant_time_eq::constant_time_eq;
use std::sync::Arc;
use uuid::Uuid;

use ms_shared::utils::{email, password};

use crate::domain::entities::reset_token::{password_fingerprint, PasswordResetClaims};
use crate::domain::entities::subject::UserType;
use crate::domain::value_objects::notification::Notification;
use crate::errors::{DomainError, DomainResult, TokenError};
use crate::repositories::SubjectDirectory;
use crate::services::credential::CredentialService;
use crate::services::notification::NotificationDispatcher;

use super::config::PasswordResetConfig;
use super::signer::ResetTokenSigner;

/// Issues reset links by e-mail and applies new passwords from them.
///
/// Links are stateless: the token embeds a fingerprint of the password hash
/// current at issuance, so the first successful reset invalidates every
/// link issued before it.
pub struct PasswordResetService {
    subjects: SubjectDirectory,
    credentials: Arc<dyn CredentialService>,
    notifier: Arc<dyn NotificationDispatcher>,
    signer: Arc<dyn ResetTokenSigner>,
    config: PasswordResetConfig,
}

impl PasswordResetService {
    pub fn new(
        subjects: SubjectDirectory,
        credentials: Arc<dyn CredentialService>,
        notifier: Arc<dyn NotificationDispatcher>,
        signer: Arc<dyn ResetTokenSigner>,
        config: PasswordResetConfig,
    ) -> Self {
        Self {
            subjects,
            credentials,
            notifier,
            signer,
            config,
        }
    }

    /// E-mail a reset link to the subject registered with `email_address`
    pub async fn create_link(&self, email_address: &str, user_type: UserType) -> DomainResult<()> {
        if !email::is_valid_email(email_address) {
            return Err(DomainError::validation("Invalid email address"));
        }
        let email_address = email::normalize_email(email_address);

        let subject = self
            .subjects
            .for_type(user_type)
            .find_by_email(&email_address)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!("{} with email {}", user_type, email_address))
            })?;

        let claims = PasswordResetClaims::for_subject(
            &subject,
            self.config.token_expiry_minutes,
            &self.config.issuer,
            &self.config.audience,
        );
        let token = self.signer.sign(&claims)?;
        let notification =
            Notification::password_reset(email_address.as_str(), self.config.reset_link(&token));

        self.notifier.send(&notification).await.map_err(|e| {
            tracing::error!(
                subject_id = %subject.id,
                user_type = %user_type,
                error = %e,
                event = "reset_link_delivery_failed",
                "Failed to deliver password reset link"
            );
            DomainError::NotificationFailed { message: e }
        })?;

        tracing::info!(
            subject_id = %subject.id,
            user_type = %user_type,
            email = %email::mask_email(&email_address),
            jti = %claims.jti,
            event = "reset_link_sent",
            "Password reset link sent"
        );

        Ok(())
    }

    /// Apply a new password using a reset token, returning the subject id
    pub async fn reset_password(&self, token: &str, new_password: &str) -> DomainResult<Uuid> {
        let claims = self.signer.decode(token.trim())?;
        let subject_id = claims.subject_id().ok_or(TokenError::InvalidToken)?;
        let store = self.subjects.for_type(claims.user_type);

        let subject = store
            .find_by_id(subject_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("{} {}", claims.user_type, subject_id)))?;

        let current = password_fingerprint(subject.password_hash.as_deref());
        if !constant_time_eq(current.as_bytes(), claims.pwd.as_bytes()) {
            tracing::warn!(
                subject_id = %subject_id,
                jti = %claims.jti,
                event = "reset_token_reused",
                "Reset token no longer matches the stored password"
            );
            return Err(TokenError::TokenRevoked.into());
        }

        let failed = password::check_password_strength(new_password);
        if !failed.is_empty() {
            let message = failed
                .iter()
                .map(|rule| rule.message())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(DomainError::validation(message));
        }

        let password_hash = self.credentials.encrypt_secret(new_password).await?;
        store.set_password_hash(subject_id, &password_hash).await?;

        tracing::info!(
            subject_id = %subject_id,
            user_type = %claims.user_type,
            jti = %claims.jti,
            event = "password_reset",
            "Password updated from reset link"
        );

        Ok(subject_id)
    }
}
