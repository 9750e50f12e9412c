//! Main OTP service implementation

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use ms_shared::utils::{email, phone};

use crate::domain::entities::otp_record::{OtpKey, OtpRecord};
use crate::domain::entities::subject::{Category, Subject};
use crate::domain::value_objects::notification::Notification;
use crate::errors::{DomainError, DomainResult};
use crate::repositories::{IssueWrite, OtpRepository, SubjectDirectory};
use crate::services::credential::CredentialService;
use crate::services::notification::NotificationDispatcher;

use super::config::OtpServiceConfig;
use super::types::{
    IssueOtpRequest, IssueOutcome, ResendOtpRequest, ResendOutcome, ValidateOtpRequest,
};

/// Issues, validates and re-sends one-time passcodes bound to a
/// (subject, user type, channel) triple
pub struct OtpService {
    subjects: SubjectDirectory,
    otps: Arc<dyn OtpRepository>,
    credentials: Arc<dyn CredentialService>,
    notifier: Arc<dyn NotificationDispatcher>,
    config: OtpServiceConfig,
}

impl OtpService {
    pub fn new(
        subjects: SubjectDirectory,
        otps: Arc<dyn OtpRepository>,
        credentials: Arc<dyn CredentialService>,
        notifier: Arc<dyn NotificationDispatcher>,
        config: OtpServiceConfig,
    ) -> Self {
        Self {
            subjects,
            otps,
            credentials,
            notifier,
            config,
        }
    }

    /// Send a code to a destination unless the channel is already verified
    /// or a live code for the same destination is pending.
    ///
    /// This method:
    /// 1. Validates and normalizes the destination
    /// 2. Resolves the subject, registering a bare one when needed
    /// 3. Generates and hashes a new code
    /// 4. Stores it with a single conditional write
    /// 5. Delivers it, rolling the write back if delivery fails
    pub async fn issue(&self, request: IssueOtpRequest) -> DomainResult<IssueOutcome> {
        let destination = normalize_destination(request.category, &request.destination)?;
        let store = self.subjects.for_type(request.user_type);

        let existing = match request.user_id {
            Some(id) => store.find_by_id(id).await?,
            None => None,
        };

        let subject = match existing {
            Some(subject) => {
                if let Some(verified) = subject.channel(request.category).filter(|v| !v.is_empty())
                {
                    tracing::info!(
                        subject_id = %subject.id,
                        user_type = %request.user_type,
                        category = %request.category,
                        event = "otp_already_verified",
                        "Channel already verified, no code issued"
                    );
                    return Ok(IssueOutcome::AlreadyVerified {
                        subject_id: subject.id,
                        destination: verified.to_string(),
                    });
                }
                subject
            }
            None => {
                let created = store.create(Subject::new_bare(request.user_type)).await?;
                tracing::info!(
                    subject_id = %created.id,
                    user_type = %request.user_type,
                    event = "subject_registered",
                    "Registered bare subject for OTP issuance"
                );
                created
            }
        };

        let key = OtpKey::new(subject.id, request.user_type, request.category);
        let code = self.credentials.generate_hashed_code().await?;
        let record = OtpRecord::new(
            key,
            code.hash,
            destination.clone(),
            self.config.expiration_minutes,
        );
        let record_id = record.id;

        match self.otps.insert_or_keep(record, Utc::now()).await? {
            IssueWrite::Kept(existing) => {
                tracing::info!(
                    subject_id = %subject.id,
                    category = %request.category,
                    expires_at = %existing.expires_at,
                    event = "otp_already_sent",
                    "Live code already pending for this destination"
                );
                return Ok(IssueOutcome::AlreadySent {
                    subject_id: subject.id,
                });
            }
            IssueWrite::Replaced { previous, .. } => {
                tracing::debug!(
                    subject_id = %subject.id,
                    previous_id = %previous.id,
                    "Replaced stale or redirected code"
                );
            }
            IssueWrite::Created(_) => {}
        }

        let notification = Notification::otp(
            request.category,
            destination.as_str(),
            self.config.company_name.as_str(),
            code.plaintext,
        );
        let message_id = self
            .deliver_or_roll_back(key, record_id, &notification)
            .await?;

        tracing::info!(
            subject_id = %subject.id,
            user_type = %request.user_type,
            category = %request.category,
            destination = %mask_destination(request.category, &destination),
            event = "otp_issued",
            "Issued verification code"
        );

        Ok(IssueOutcome::Sent {
            subject_id: subject.id,
            message_id,
        })
    }

    /// Check a submitted code and, on success, consume it and mark the
    /// channel verified with the destination the code was sent to.
    ///
    /// A wrong guess leaves the code in place until `max_attempts` wrong
    /// guesses have been made against it, after which it is discarded.
    pub async fn validate(&self, request: ValidateOtpRequest) -> DomainResult<()> {
        if request.otp.trim().is_empty() {
            return Err(DomainError::validation("otp is required"));
        }

        let key = OtpKey::new(request.user_id, request.user_type, request.category);
        let record = match self.otps.find(&key).await? {
            Some(record)
                if !record.is_expired_at(Utc::now())
                    && !record.is_exhausted(self.config.max_attempts) =>
            {
                record
            }
            _ => return Err(DomainError::OtpNotFound),
        };

        if !self
            .credentials
            .verify(request.otp.trim(), &record.otp_hash)
            .await?
        {
            self.count_failed_attempt(&key, &record).await?;
            return Err(DomainError::InvalidOtp);
        }

        // Only the caller that removes this exact record may apply it.
        if !self.otps.delete_if_current(&key, record.id).await? {
            tracing::warn!(
                subject_id = %request.user_id,
                event = "otp_consumed_concurrently",
                "Code was consumed or replaced by another request"
            );
            return Err(DomainError::OtpNotFound);
        }

        let applied = self
            .subjects
            .for_type(request.user_type)
            .set_channel(request.user_id, request.category, &record.otp_for)
            .await;
        if let Err(e) = applied {
            self.restore_unapplied(&key, record).await;
            return Err(e);
        }

        tracing::info!(
            subject_id = %request.user_id,
            user_type = %request.user_type,
            category = %request.category,
            destination = %mask_destination(request.category, &record.otp_for),
            event = "otp_validated",
            "Channel verified"
        );

        Ok(())
    }

    /// Count a wrong guess and discard the code once it has used up its attempts
    async fn count_failed_attempt(&self, key: &OtpKey, record: &OtpRecord) -> DomainResult<()> {
        let attempts = self.otps.record_failed_attempt(key, record.id).await?;

        tracing::warn!(
            subject_id = %key.user_id,
            user_type = %key.user_type,
            category = %key.category,
            attempts = attempts.unwrap_or(record.attempts),
            event = "otp_mismatch",
            "Submitted code does not match"
        );

        if attempts.is_some_and(|n| n >= self.config.max_attempts)
            && self.otps.delete_if_current(key, record.id).await?
        {
            tracing::warn!(
                subject_id = %key.user_id,
                category = %key.category,
                event = "otp_attempts_exhausted",
                "Discarded code after too many wrong guesses"
            );
        }

        Ok(())
    }

    /// Put back a consumed code whose subject update failed, so the same
    /// code can be submitted again. A code issued meanwhile wins.
    async fn restore_unapplied(&self, key: &OtpKey, record: OtpRecord) {
        let record_id = record.id;
        match self.otps.insert_if_absent(record).await {
            Ok(true) => tracing::warn!(
                subject_id = %key.user_id,
                record_id = %record_id,
                event = "otp_restored",
                "Subject update failed, code restored"
            ),
            Ok(false) => tracing::warn!(
                subject_id = %key.user_id,
                record_id = %record_id,
                "Subject update failed and a newer code is pending"
            ),
            Err(e) => tracing::error!(
                subject_id = %key.user_id,
                record_id = %record_id,
                error = %e,
                "Failed to restore code after subject update failure"
            ),
        }
    }

    /// Replace any pending code with a fresh one and deliver it
    pub async fn resend(&self, request: ResendOtpRequest) -> DomainResult<ResendOutcome> {
        let destination = normalize_destination(request.category, &request.destination)?;
        let subject = self
            .subjects
            .for_type(request.user_type)
            .find_by_id(request.user_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!("{} {}", request.user_type, request.user_id))
            })?;

        let key = OtpKey::new(subject.id, request.user_type, request.category);
        let code = self.credentials.generate_hashed_code().await?;
        let record = OtpRecord::new(
            key,
            code.hash,
            destination.clone(),
            self.config.expiration_minutes,
        );
        let record_id = record.id;

        if let Some(previous) = self.otps.replace(record).await? {
            tracing::debug!(
                subject_id = %subject.id,
                previous_id = %previous.id,
                "Discarded pending code on resend"
            );
        }

        let notification = Notification::otp(
            request.category,
            destination.as_str(),
            self.config.company_name.as_str(),
            code.plaintext,
        );
        let message_id = self
            .deliver_or_roll_back(key, record_id, &notification)
            .await?;

        tracing::info!(
            subject_id = %subject.id,
            user_type = %request.user_type,
            category = %request.category,
            destination = %mask_destination(request.category, &destination),
            event = "otp_resent",
            "Re-sent verification code"
        );

        Ok(ResendOutcome {
            subject_id: subject.id,
            message_id,
        })
    }

    /// Deliver a code; on failure remove the record written for it, unless a
    /// newer record has replaced it meanwhile
    async fn deliver_or_roll_back(
        &self,
        key: OtpKey,
        record_id: Uuid,
        notification: &Notification,
    ) -> DomainResult<String> {
        match self.notifier.send(notification).await {
            Ok(message_id) => Ok(message_id),
            Err(e) => {
                tracing::error!(
                    subject_id = %key.user_id,
                    category = %key.category,
                    destination = %mask_destination(key.category, &notification.destination),
                    error = %e,
                    event = "otp_delivery_failed",
                    "Failed to deliver verification code"
                );

                if let Err(rollback) = self.otps.delete_if_current(&key, record_id).await {
                    tracing::error!(
                        subject_id = %key.user_id,
                        error = %rollback,
                        "Failed to roll back undelivered code"
                    );
                }

                Err(DomainError::NotificationFailed { message: e })
            }
        }
    }
}

/// Validate a destination for its channel and return the stored form:
/// lowercase e-mail or E.164 phone number
pub fn normalize_destination(category: Category, raw: &str) -> DomainResult<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DomainError::validation(format!("{} is required", category)));
    }

    match category {
        Category::Email => {
            if email::is_valid_email(raw) {
                Ok(email::normalize_email(raw))
            } else {
                Err(DomainError::validation("Invalid email address"))
            }
        }
        Category::PhoneNo => phone::parse_e164(raw).ok_or_else(|| {
            DomainError::validation("Invalid phone number, expected E.164 format (e.g. +14155552671)")
        }),
    }
}

fn mask_destination(category: Category, destination: &str) -> String {
    match category {
        Category::Email => email::mask_email(destination),
        Category::PhoneNo => phone::mask_phone_number(destination),
    }
}
