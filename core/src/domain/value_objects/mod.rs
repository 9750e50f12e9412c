//! Value objects for domain operations.

pub mod notification;

pub use notification::{Notification, NotificationTemplate};
