//! Mock e-mail service for development

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use ms_shared::utils::mask_email;

use crate::InfrastructureError;

use super::{EmailService, OutgoingEmail};

#[derive(Debug, Default)]
pub struct MockEmailService {
    counter: AtomicUsize,
}

impl MockEmailService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_message_count(&self) -> usize {
        self.counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmailService for MockEmailService {
    async fn send_email(&self, email: &OutgoingEmail<'_>) -> Result<String, InfrastructureError> {
        if !email.to.contains('@') {
            return Err(InfrastructureError::Email(format!(
                "Invalid recipient: {}",
                mask_email(email.to)
            )));
        }

        let count = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!(
            to = %mask_email(email.to),
            subject = email.subject,
            provider = "mock",
            event = "email_sent",
            "Mock e-mail sent"
        );

        Ok(format!("mock_email_{}", count))
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
