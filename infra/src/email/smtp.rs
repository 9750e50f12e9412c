//! SMTP delivery through lettre

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use uuid::Uuid;

use ms_shared::config::EmailConfig;
use ms_shared::utils::mask_email;

use crate::InfrastructureError;

use super::{EmailService, OutgoingEmail};

pub struct SmtpEmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    /// Domain part used for generated Message-IDs
    id_domain: String,
}

impl SmtpEmailService {
    pub fn new(config: &EmailConfig) -> Result<Self, InfrastructureError> {
        let from: Mailbox = config.from_address.parse().map_err(|e| {
            InfrastructureError::Config(format!("Invalid SMTP_FROM address: {}", e))
        })?;

        let builder = if config.smtp_starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                .map_err(|e| InfrastructureError::Config(format!("Invalid SMTP host: {}", e)))?
        } else {
            // Plain connection, for local catch-all servers only
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
        };
        let mut builder = builder.port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let id_domain = from.email.domain().to_string();

        tracing::info!(
            host = %config.smtp_host,
            port = config.smtp_port,
            starttls = config.smtp_starttls,
            "SMTP e-mail service initialized"
        );

        Ok(Self {
            mailer: builder.build(),
            from,
            id_domain,
        })
    }

    fn build_message(
        &self,
        email: &OutgoingEmail<'_>,
        message_id: &str,
    ) -> Result<Message, InfrastructureError> {
        let to: Mailbox = email.to.parse().map_err(|e| {
            InfrastructureError::Email(format!("Invalid recipient {}: {}", mask_email(email.to), e))
        })?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject)
            .message_id(Some(message_id.to_string()))
            .multipart(MultiPart::alternative_plain_html(
                email.text_body.to_string(),
                email.html_body.to_string(),
            ))
            .map_err(|e| InfrastructureError::Email(format!("Failed to build e-mail: {}", e)))
    }
}

#[async_trait]
impl EmailService for SmtpEmailService {
    async fn send_email(&self, email: &OutgoingEmail<'_>) -> Result<String, InfrastructureError> {
        let message_id = format!("<{}@{}>", Uuid::new_v4(), self.id_domain);
        let message = self.build_message(email, &message_id)?;

        self.mailer.send(message).await.map_err(|e| {
            tracing::error!(to = %mask_email(email.to), error = %e, "SMTP delivery failed");
            InfrastructureError::Email(format!("SMTP delivery failed: {}", e))
        })?;

        tracing::info!(
            to = %mask_email(email.to),
            message_id = %message_id,
            provider = "smtp",
            event = "email_sent",
            "E-mail sent"
        );

        Ok(message_id)
    }

    fn provider_name(&self) -> &'static str {
        "smtp"
    }
}
