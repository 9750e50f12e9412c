//! Routes core notifications to the SMS or e-mail provider

use async_trait::async_trait;

use ms_core::domain::entities::subject::Category;
use ms_core::domain::value_objects::notification::Notification;
use ms_core::services::NotificationDispatcher;

use crate::email::{EmailService, OutgoingEmail};
use crate::sms::SmsService;

/// [`NotificationDispatcher`] backed by one SMS and one e-mail provider
pub struct ChannelDispatcher {
    sms: Box<dyn SmsService>,
    email: Box<dyn EmailService>,
}

impl ChannelDispatcher {
    pub fn new(sms: Box<dyn SmsService>, email: Box<dyn EmailService>) -> Self {
        tracing::info!(
            sms_provider = sms.provider_name(),
            email_provider = email.provider_name(),
            "Notification dispatcher ready"
        );
        Self { sms, email }
    }
}

#[async_trait]
impl NotificationDispatcher for ChannelDispatcher {
    async fn send(&self, notification: &Notification) -> Result<String, String> {
        let result = match notification.channel {
            Category::PhoneNo => {
                self.sms
                    .send_sms(&notification.destination, &notification.text_body())
                    .await
            }
            Category::Email => {
                let subject = notification.subject();
                let text_body = notification.text_body();
                let html_body = notification.html_body();
                self.email
                    .send_email(&OutgoingEmail {
                        to: &notification.destination,
                        subject: &subject,
                        text_body: &text_body,
                        html_body: &html_body,
                    })
                    .await
            }
        };

        result.map_err(|e| e.to_string())
    }
}
