//! Subjects: the admins, tenants and users an OTP can be issued to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Which of the three disjoint subject stores a subject lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Admin,
    Tenant,
    User,
}

impl UserType {
    pub const ALL: [UserType; 3] = [UserType::Admin, UserType::Tenant, UserType::User];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Admin => "admin",
            UserType::Tenant => "tenant",
            UserType::User => "user",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserType::Admin),
            "tenant" => Ok(UserType::Tenant),
            "user" => Ok(UserType::User),
            other => Err(format!("Invalid user type: {}", other)),
        }
    }
}

/// Contact channel an OTP verifies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "phoneNo")]
    PhoneNo,
    #[serde(rename = "email")]
    Email,
}

impl Category {
    /// Wire name, also used as the stored category value
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::PhoneNo => "phoneNo",
            Category::Email => "email",
        }
    }

    /// Subject column holding the verified destination for this channel
    pub fn column(&self) -> &'static str {
        match self {
            Category::PhoneNo => "phone_no",
            Category::Email => "email",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "phoneNo" => Ok(Category::PhoneNo),
            "email" => Ok(Category::Email),
            other => Err(format!("Invalid category: {}", other)),
        }
    }
}

/// A subject record. A populated `email` or `phone_no` means that channel
/// has been verified.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: Uuid,
    pub user_type: UserType,
    pub email: Option<String>,
    pub phone_no: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub role_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subject {
    /// A subject with no verified channels, no password and no role
    pub fn new_bare(user_type: UserType) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_type,
            email: None,
            phone_no: None,
            password_hash: None,
            role_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn channel(&self, category: Category) -> Option<&str> {
        match category {
            Category::PhoneNo => self.phone_no.as_deref(),
            Category::Email => self.email.as_deref(),
        }
    }

    pub fn is_channel_verified(&self, category: Category) -> bool {
        self.channel(category).is_some_and(|value| !value.is_empty())
    }

    /// Record a verified destination for the channel
    pub fn set_channel(&mut self, category: Category, value: impl Into<String>) {
        let value = Some(value.into());
        match category {
            Category::PhoneNo => self.phone_no = value,
            Category::Email => self.email = value,
        }
        self.updated_at = Utc::now();
    }

    pub fn set_password_hash(&mut self, hash: impl Into<String>) {
        self.password_hash = Some(hash.into());
        self.updated_at = Utc::now();
    }
}

impl fmt::Debug for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("id", &self.id)
            .field("user_type", &self.user_type)
            .field("email", &self.email)
            .field("phone_no", &self.phone_no)
            .field("has_password", &self.password_hash.is_some())
            .field("role_id", &self.role_id)
            .finish()
    }
}
