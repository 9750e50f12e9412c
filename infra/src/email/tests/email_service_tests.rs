use ms_shared::config::EmailConfig;

use crate::email::{create_email_service, EmailService, MockEmailService, OutgoingEmail};
use crate::InfrastructureError;

fn email(to: &str) -> OutgoingEmail<'_> {
    OutgoingEmail {
        to,
        subject: "Your Moreshop verification code",
        text_body: "Your Moreshop verification code is 123456",
        html_body: "<p>Your Moreshop verification code is 123456</p>",
    }
}

#[tokio::test]
async fn test_mock_email_counts_messages() {
    let service = MockEmailService::new();
    assert_eq!(service.send_email(&email("a@shop.io")).await.unwrap(), "mock_email_1");
    assert_eq!(service.send_email(&email("b@shop.io")).await.unwrap(), "mock_email_2");
    assert_eq!(service.get_message_count(), 2);
}

#[tokio::test]
async fn test_mock_email_rejects_bad_recipient() {
    let service = MockEmailService::new();
    let result = service.send_email(&email("not-an-address")).await;
    assert!(matches!(result, Err(InfrastructureError::Email(_))));
}

#[test]
fn test_factory_defaults_to_mock() {
    let service = create_email_service(&EmailConfig::default()).unwrap();
    assert_eq!(service.provider_name(), "mock");
}

#[tokio::test]
async fn test_factory_builds_smtp() {
    let config = EmailConfig {
        provider: "smtp".to_string(),
        smtp_host: "127.0.0.1".to_string(),
        smtp_port: 2525,
        smtp_starttls: false,
        ..Default::default()
    };
    let service = create_email_service(&config).unwrap();
    assert_eq!(service.provider_name(), "smtp");
}

#[test]
fn test_smtp_rejects_bad_from_address() {
    let config = EmailConfig {
        provider: "smtp".to_string(),
        from_address: "nobody".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        create_email_service(&config),
        Err(InfrastructureError::Config(_))
    ));
}

#[tokio::test]
async fn test_smtp_unreachable_server_fails() {
    let config = EmailConfig {
        provider: "smtp".to_string(),
        smtp_host: "127.0.0.1".to_string(),
        smtp_port: 1,
        smtp_starttls: false,
        ..Default::default()
    };
    let service = create_email_service(&config).unwrap();
    let result = service.send_email(&email("a@shop.io")).await;
    assert!(matches!(result, Err(InfrastructureError::Email(_))));
}
