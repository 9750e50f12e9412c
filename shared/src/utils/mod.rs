//! Utility functions

pub mod email;
pub mod password;
pub mod phone;

pub use email::{is_valid_email, mask_email, normalize_email};
pub use password::{check_password_strength, PasswordRule};
pub use phone::{mask_phone_number, normalize_phone_number, parse_e164};
