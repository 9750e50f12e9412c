use chrono::Duration;
use uuid::Uuid;

use crate::domain::entities::otp_record::{OtpKey, OtpRecord};
use crate::domain::entities::subject::{Category, UserType};

fn key() -> OtpKey {
    OtpKey::new(Uuid::new_v4(), UserType::Admin, Category::Email)
}

#[test]
fn test_new_record_expiry() {
    let record = OtpRecord::new(key(), "hash".to_string(), "a@moreshop.io", 10);
    assert_eq!(record.expires_at - record.created_at, Duration::minutes(10));
    assert!(!record.is_expired());
    assert!(record.is_expired_at(record.expires_at));
}

#[test]
fn test_is_live_for() {
    let record = OtpRecord::new(key(), "hash".to_string(), "a@moreshop.io", 10);
    let now = record.created_at;
    assert!(record.is_live_for("a@moreshop.io", now));
    assert!(!record.is_live_for("b@moreshop.io", now));
    assert!(!record.is_live_for("a@moreshop.io", now + Duration::minutes(11)));
}

#[test]
fn test_each_record_gets_a_fresh_id() {
    let k = key();
    let first = OtpRecord::new(k, "hash".to_string(), "a@moreshop.io", 10);
    let second = OtpRecord::new(k, "hash".to_string(), "a@moreshop.io", 10);
    assert_eq!(first.key(), second.key());
    assert_ne!(first.id, second.id);
}

#[test]
fn test_debug_redacts_hash() {
    let record = OtpRecord::new(key(), "$2b$10$abcdef".to_string(), "a@moreshop.io", 10);
    assert!(!format!("{:?}", record).contains("abcdef"));
}

#[test]
fn test_attempts_start_at_zero_and_exhaust() {
    let mut record = OtpRecord::new(key(), "hash".to_string(), "a@moreshop.io", 10);
    assert_eq!(record.attempts, 0);
    assert!(!record.is_exhausted(3));

    record.attempts = 3;
    assert!(record.is_exhausted(3));
}
