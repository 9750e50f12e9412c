//! Delivery seam between the services and the SMS / e-mail adapters.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::entities::subject::Category;
use crate::domain::value_objects::notification::{Notification, NotificationTemplate};

/// Sends a notification to its destination
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Deliver the notification, returning the provider's message id
    async fn send(&self, notification: &Notification) -> Result<String, String>;
}

/// Dispatcher that keeps every notification in memory instead of sending it.
/// Used by tests to read back the codes and links that would have been sent.
#[derive(Default)]
pub struct RecordingNotificationDispatcher {
    sent: Mutex<Vec<Notification>>,
    failing: Mutex<bool>,
}

impl RecordingNotificationDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following send fail until reset
    pub fn set_failing(&self, failing: bool) {
        if let Ok(mut flag) = self.failing.lock() {
            *flag = failing;
        }
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().map(|sent| sent.len()).unwrap_or_default()
    }

    /// The most recent OTP code sent to `destination` on `channel`
    pub fn last_code_for(&self, channel: Category, destination: &str) -> Option<String> {
        self.sent().into_iter().rev().find_map(|n| match n.template {
            NotificationTemplate::Otp { code, .. }
                if n.channel == channel && n.destination == destination =>
            {
                Some(code)
            }
            _ => None,
        })
    }

    /// The most recent reset link sent to `destination`
    pub fn last_reset_link_for(&self, destination: &str) -> Option<String> {
        self.sent().into_iter().rev().find_map(|n| match n.template {
            NotificationTemplate::PasswordReset { link } if n.destination == destination => {
                Some(link)
            }
            _ => None,
        })
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingNotificationDispatcher {
    async fn send(&self, notification: &Notification) -> Result<String, String> {
        let failing = self.failing.lock().map(|flag| *flag).unwrap_or(false);
        if failing {
            return Err("delivery provider unavailable".to_string());
        }

        let mut sent = self
            .sent
            .lock()
            .map_err(|_| "recording dispatcher poisoned".to_string())?;
        sent.push(notification.clone());
        Ok(format!("recorded-{}", sent.len()))
    }
}
