//! Outbound messages handed to the notification dispatcher.

use std::fmt;

use crate::domain::entities::subject::Category;

/// What the message says
#[derive(Clone, PartialEq, Eq)]
pub enum NotificationTemplate {
    Otp { company_name: String, code: String },
    PasswordReset { link: String },
}

/// A message for one destination on one channel
#[derive(Clone, PartialEq, Eq)]
pub struct Notification {
    pub channel: Category,
    pub destination: String,
    pub template: NotificationTemplate,
}

impl Notification {
    pub fn otp(
        channel: Category,
        destination: impl Into<String>,
        company_name: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            channel,
            destination: destination.into(),
            template: NotificationTemplate::Otp {
                company_name: company_name.into(),
                code: code.into(),
            },
        }
    }

    /// Reset links always go out by e-mail
    pub fn password_reset(destination: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            channel: Category::Email,
            destination: destination.into(),
            template: NotificationTemplate::PasswordReset { link: link.into() },
        }
    }

    pub fn subject(&self) -> String {
        match &self.template {
            NotificationTemplate::Otp { company_name, .. } => {
                format!("Your {} verification code", company_name)
            }
            NotificationTemplate::PasswordReset { .. } => "Password reset link".to_string(),
        }
    }

    pub fn text_body(&self) -> String {
        match &self.template {
            NotificationTemplate::Otp { company_name, code } => format!(
                "Your {} verification code is {}. Do not share it with anyone.",
                company_name, code
            ),
            NotificationTemplate::PasswordReset { link } => {
                format!("Here is your password reset link: {}", link)
            }
        }
    }

    pub fn html_body(&self) -> String {
        match &self.template {
            NotificationTemplate::Otp { company_name, code } => format!(
                "<p>Your {} verification code is <strong>{}</strong>.</p><p>Do not share it with anyone.</p>",
                company_name, code
            ),
            NotificationTemplate::PasswordReset { link } => {
                format!("<h1>Here is your password reset link: {}</h1>", link)
            }
        }
    }

    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self.template {
            NotificationTemplate::Otp { .. } => "otp",
            NotificationTemplate::PasswordReset { .. } => "password_reset",
        }
    }
}

// Codes and reset links are credentials; keep them out of Debug output.
impl fmt::Debug for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notification")
            .field("channel", &self.channel)
            .field("kind", &self.kind())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_bodies_carry_code() {
        let n = Notification::otp(Category::Email, "a@moreshop.io", "Moreshop", "042137");
        assert!(n.text_body().contains("042137"));
        assert!(n.html_body().contains("042137"));
        assert_eq!(n.subject(), "Your Moreshop verification code");
    }

    #[test]
    fn test_reset_goes_by_email() {
        let n = Notification::password_reset("a@moreshop.io", "https://x/reset-password?resetToken=t");
        assert_eq!(n.channel, Category::Email);
        assert_eq!(n.subject(), "Password reset link");
        assert!(n.text_body().ends_with("resetToken=t"));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let n = Notification::otp(Category::PhoneNo, "+14155552671", "Moreshop", "042137");
        let debug = format!("{:?}", n);
        assert!(!debug.contains("042137"));
        assert!(!debug.contains("4155552671"));
    }
}
