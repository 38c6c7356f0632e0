//! `PostgreSQL` adapters for offer persistence.

pub(crate) mod models;
pub(crate) mod queries;
mod repository;

pub use repository::PostgresOfferRepository;
