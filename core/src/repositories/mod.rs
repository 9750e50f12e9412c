//! Repository interfaces and in-memory adapters.

pub mod otp;
pub mod subject;

pub use otp::{InMemoryOtpRepository, IssueWrite, OtpRepository};
pub use subject::{InMemorySubjectRepository, SubjectDirectory, SubjectRepository};
