//! Port contracts for the task store.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod repository;

pub use repository::{StatusUpdate, TaskRepository, TaskRepositoryError, TaskRepositoryResult};
