//! Phone number utilities

use phonenumber::{Mode, PhoneNumber};

/// Normalize a phone number by removing common formatting characters
pub fn normalize_phone_number(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Parse a phone number and return it in E.164 form.
///
/// Numbers must carry their country code (`+` prefix); there is no
/// default region for a multi-tenant deployment.
pub fn parse_e164(phone: &str) -> Option<String> {
    let normalized = normalize_phone_number(phone);
    if !normalized.starts_with('+') {
        return None;
    }

    let parsed = normalized.parse::<PhoneNumber>().ok()?;
    if !phonenumber::is_valid(&parsed) {
        return None;
    }
    Some(parsed.format().mode(Mode::E164).to_string())
}

/// Check if a phone number is a valid international number
pub fn is_valid_phone(phone: &str) -> bool {
    parse_e164(phone).is_some()
}

/// Mask a phone number for logs (e.g., +14****2671)
pub fn mask_phone_number(phone: &str) -> String {
    let normalized = normalize_phone_number(phone);
    if normalized.len() >= 7 {
        format!(
            "{}****{}",
            &normalized[0..3],
            &normalized[normalized.len() - 4..]
        )
    } else {
        "****".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone_number() {
        assert_eq!(normalize_phone_number("+1 (415) 555-2671"), "+14155552671");
        assert_eq!(normalize_phone_number("+44 20 7183 8750"), "+442071838750");
    }

    #[test]
    fn test_parse_e164() {
        assert_eq!(parse_e164("+1 415 555 2671"), Some("+14155552671".to_string()));
        assert_eq!(parse_e164("+442071838750"), Some("+442071838750".to_string()));
        assert_eq!(parse_e164("4155552671"), None);
        assert_eq!(parse_e164("+12"), None);
        assert!(!is_valid_phone("not a phone"));
    }

    #[test]
    fn test_mask_phone_number() {
        assert_eq!(mask_phone_number("+14155552671"), "+14****2671");
        assert_eq!(mask_phone_number("12345"), "****");
    }
}
