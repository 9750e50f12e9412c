//! Password strength rules for reset requests

/// Characters accepted as the mandatory symbol
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*";

pub const PASSWORD_MIN_LENGTH: usize = 8;

/// A rule a candidate password failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    MinLength,
    Lowercase,
    Uppercase,
    Digit,
    Symbol,
}

impl PasswordRule {
    pub fn message(&self) -> &'static str {
        match self {
            PasswordRule::MinLength => "Password must be at least 8 characters long",
            PasswordRule::Lowercase => "Password must contain a lowercase letter",
            PasswordRule::Uppercase => "Password must contain an uppercase letter",
            PasswordRule::Digit => "Password must contain a digit",
            PasswordRule::Symbol => "Password must contain one of !@#$%^&*",
        }
    }
}

/// Return every rule the password breaks; empty means acceptable
pub fn check_password_strength(password: &str) -> Vec<PasswordRule> {
    let mut failed = Vec::new();

    if password.chars().count() < PASSWORD_MIN_LENGTH {
        failed.push(PasswordRule::MinLength);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        failed.push(PasswordRule::Lowercase);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        failed.push(PasswordRule::Uppercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        failed.push(PasswordRule::Digit);
    }
    if !password.chars().any(|c| PASSWORD_SYMBOLS.contains(c)) {
        failed.push(PasswordRule::Symbol);
    }

    failed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strong_password_passes() {
        assert!(check_password_strength("Sup3r!secret").is_empty());
    }

    #[test]
    fn test_each_rule_is_reported() {
        assert_eq!(check_password_strength("Ab1!"), vec![PasswordRule::MinLength]);
        assert_eq!(
            check_password_strength("password"),
            vec![PasswordRule::Uppercase, PasswordRule::Digit, PasswordRule::Symbol]
        );
        assert_eq!(
            check_password_strength("PASSWORD1!"),
            vec![PasswordRule::Lowercase]
        );
    }
}
