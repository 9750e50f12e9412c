//! Configuration for the password reset service

use ms_shared::config::{JwtConfig, NotificationConfig};

#[derive(Debug, Clone)]
pub struct PasswordResetConfig {
    /// Base URL of the admin frontend; the link is `{frontend_url}/reset-password?resetToken=…`
    pub frontend_url: String,
    pub token_expiry_minutes: i64,
    pub issuer: String,
    pub audience: String,
}

impl Default for PasswordResetConfig {
    fn default() -> Self {
        let jwt = JwtConfig::default();
        Self {
            frontend_url: "http://localhost:3000".to_string(),
            token_expiry_minutes: jwt.reset_token_expiry_minutes,
            issuer: jwt.issuer,
            audience: jwt.audience,
        }
    }
}

impl PasswordResetConfig {
    pub fn from_app_config(jwt: &JwtConfig, notification: &NotificationConfig) -> Self {
        Self {
            frontend_url: notification.frontend_url.trim_end_matches('/').to_string(),
            token_expiry_minutes: jwt.reset_token_expiry_minutes,
            issuer: jwt.issuer.clone(),
            audience: jwt.audience.clone(),
        }
    }

    pub fn reset_link(&self, token: &str) -> String {
        format!("{}/reset-password?resetToken={}", self.frontend_url, token)
    }
}
