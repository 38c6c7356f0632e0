//! `PostgreSQL` adapters for task persistence.

pub(crate) mod models;
pub(crate) mod queries;
mod repository;

pub use repository::PostgresTaskRepository;
