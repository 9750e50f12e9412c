use ms_shared::config::SmsConfig;

use crate::sms::create_sms_service;
use crate::InfrastructureError;

#[test]
fn test_mock_provider() {
    let service = create_sms_service(&SmsConfig::default()).unwrap();
    assert_eq!(service.provider_name(), "mock");
}

#[test]
fn test_unknown_provider_falls_back_to_mock() {
    let config = SmsConfig {
        provider: "carrier-pigeon".to_string(),
        ..Default::default()
    };
    let service = create_sms_service(&config).unwrap();
    assert_eq!(service.provider_name(), "mock");
}

#[test]
fn test_twilio_without_credentials_is_config_error() {
    let config = SmsConfig {
        provider: "twilio".to_string(),
        ..Default::default()
    };
    let result = create_sms_service(&config);
    assert!(matches!(result, Err(InfrastructureError::Config(_))));
}

#[test]
fn test_twilio_from_number_must_be_e164() {
    let config = SmsConfig {
        provider: "twilio".to_string(),
        twilio_account_sid: Some("AC123".to_string()),
        twilio_auth_token: Some("token".to_string()),
        twilio_from_number: Some("4155550000".to_string()),
        ..Default::default()
    };
    match create_sms_service(&config) {
        Err(InfrastructureError::Config(msg)) => assert!(msg.contains("E.164")),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("expected a configuration error"),
    }
}

#[test]
fn test_twilio_with_credentials() {
    let config = SmsConfig {
        provider: "twilio".to_string(),
        twilio_account_sid: Some("AC123".to_string()),
        twilio_auth_token: Some("token".to_string()),
        twilio_from_number: Some("+14155550000".to_string()),
        ..Default::default()
    };
    let service = create_sms_service(&config).unwrap();
    assert_eq!(service.provider_name(), "twilio");
}
