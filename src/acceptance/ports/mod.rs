//! Port contracts for offer acceptance.

pub mod repository;

pub use repository::{AcceptanceRepository, AcceptanceRepositoryError, AcceptanceRepositoryResult};
