//! Unit tests for mock SMS service

use crate::sms::{MockSmsService, SmsService};
use crate::InfrastructureError;

#[tokio::test]
async fn test_mock_sms_send_success() {
    let service = MockSmsService::new();
    let message_id = service.send_sms("+14155552671", "Test message").await.unwrap();

    assert!(message_id.starts_with("mock_sms_"));
    assert_eq!(service.get_message_count(), 1);
}

#[tokio::test]
async fn test_mock_sms_invalid_phone() {
    let service = MockSmsService::new();
    let result = service.send_sms("4155552671", "Test message").await;

    match result {
        Err(InfrastructureError::Sms(msg)) => assert!(msg.contains("Invalid phone number")),
        other => panic!("Expected Sms error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_mock_sms_simulate_failure() {
    let service = MockSmsService::new();
    service.set_simulate_failure(true);

    assert!(service.send_sms("+14155552671", "Test").await.is_err());
    assert_eq!(service.get_message_count(), 0);
}

#[tokio::test]
async fn test_mock_sms_counter() {
    let service = MockSmsService::new();

    for i in 1..=3 {
        let id = service
            .send_sms("+14155552671", &format!("Message {}", i))
            .await
            .unwrap();
        assert_eq!(id, format!("mock_sms_{}", i));
    }
    assert_eq!(service.get_message_count(), 3);
}
