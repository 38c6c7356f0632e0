//! Port contracts for the chat fabric.

pub mod repository;

pub use repository::{ChatRepository, ChatRepositoryError, ChatRepositoryResult};
