//! Mock SMS service for development and tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use ms_shared::utils::mask_phone_number;

use crate::InfrastructureError;

use super::SmsService;

/// SMS service that only logs. Message bodies are never logged because they
/// carry plaintext codes.
#[derive(Debug, Default)]
pub struct MockSmsService {
    counter: AtomicUsize,
    simulate_failure: AtomicBool,
}

impl MockSmsService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following send fail
    pub fn set_simulate_failure(&self, fail: bool) {
        self.simulate_failure.store(fail, Ordering::SeqCst);
    }

    pub fn get_message_count(&self) -> usize {
        self.counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SmsService for MockSmsService {
    async fn send_sms(&self, to: &str, body: &str) -> Result<String, InfrastructureError> {
        if !to.starts_with('+') {
            return Err(InfrastructureError::Sms(format!(
                "Invalid phone number: {}",
                mask_phone_number(to)
            )));
        }

        if self.simulate_failure.load(Ordering::SeqCst) {
            tracing::warn!(to = %mask_phone_number(to), "Mock SMS failure simulated");
            return Err(InfrastructureError::Sms("Simulated SMS failure".to_string()));
        }

        let count = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!(
            to = %mask_phone_number(to),
            length = body.len(),
            provider = "mock",
            event = "sms_sent",
            "Mock SMS sent"
        );

        Ok(format!("mock_sms_{}", count))
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
