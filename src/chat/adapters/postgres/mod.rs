//! `PostgreSQL` adapters for chat persistence.

pub(crate) mod models;
pub(crate) mod queries;
mod repository;

pub use repository::PostgresChatRepository;
