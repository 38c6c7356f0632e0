//! `PostgreSQL` adapter for the profile directory.

mod directory;
mod models;

pub use directory::PostgresProfileDirectory;
