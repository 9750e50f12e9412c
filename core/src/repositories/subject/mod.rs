pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;
pub mod directory;
pub mod memory;

#[cfg(test)]
mod tests;

pub use directory::SubjectDirectory;
pub use memory::InMemorySubjectRepository;
pub use r#trait::SubjectRepository;
