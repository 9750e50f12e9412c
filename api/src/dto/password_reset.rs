use serde::Deserialize;
use validator::Validate;

use ms_core::domain::entities::subject::UserType;

/// Body of `POST /v1/password-reset/link`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetLinkRequest {
    #[validate(email(message = "email must be a valid e-mail address"))]
    pub email: String,
    pub user_type: UserType,
}

/// Body of `POST /v1/password-reset/verify`
#[derive(Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetVerifyRequest {
    #[validate(length(min = 1, message = "resetToken is required"))]
    pub reset_token: String,
    #[validate(length(min = 1, max = 128, message = "newPassword is required"))]
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_email_fails_validation() {
        let request = PasswordResetLinkRequest {
            email: "not-an-email".to_string(),
            user_type: UserType::Admin,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_camel_case_fields() {
        let request: PasswordResetVerifyRequest = serde_json::from_value(serde_json::json!({
            "resetToken": "abc",
            "newPassword": "Str0ng!pass"
        }))
        .unwrap();
        assert_eq!(request.reset_token, "abc");
        assert!(request.validate().is_ok());
    }
}
