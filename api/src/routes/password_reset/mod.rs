//! Password reset route handlers

pub mod link;
pub mod verify;

pub use link::create_link;
pub use verify::verify_link;
