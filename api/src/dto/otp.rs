//! OTP endpoint bodies. The destination travels in the field named after
//! the path's `{type}` segment (`phoneNo` or `email`).

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use ms_core::domain::entities::subject::{Category, UserType};

/// Body of `POST /v1/otp/{type}`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOtpRequest {
    /// Omitted on first contact; a bare subject is registered
    pub user_id: Option<Uuid>,
    pub user_type: UserType,
    #[validate(length(max = 32, message = "phoneNo is too long"))]
    pub phone_no: Option<String>,
    #[validate(length(max = 255, message = "email is too long"))]
    pub email: Option<String>,
}

impl CreateOtpRequest {
    /// The destination for `category`; empty when the field is missing
    pub fn destination(&self, category: Category) -> String {
        destination(category, &self.phone_no, &self.email)
    }
}

/// Body of `POST /v1/otp/{type}/resend`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResendOtpRequest {
    pub user_id: Uuid,
    pub user_type: UserType,
    #[validate(length(max = 32, message = "phoneNo is too long"))]
    pub phone_no: Option<String>,
    #[validate(length(max = 255, message = "email is too long"))]
    pub email: Option<String>,
}

impl ResendOtpRequest {
    pub fn destination(&self, category: Category) -> String {
        destination(category, &self.phone_no, &self.email)
    }
}

/// Body of `POST /v1/otp/validate`
#[derive(Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ValidateOtpRequest {
    pub user_type: UserType,
    pub user_id: Uuid,
    pub category: Category,
    #[validate(length(min = 1, max = 16, message = "otp is required"))]
    pub otp: String,
}

fn destination(category: Category, phone_no: &Option<String>, email: &Option<String>) -> String {
    let value = match category {
        Category::PhoneNo => phone_no,
        Category::Email => email,
    };
    value.clone().unwrap_or_default()
}
