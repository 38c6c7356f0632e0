//! Port contracts for profile lookup and registration.

pub mod directory;

pub use directory::{ProfileDirectory, ProfileDirectoryError, ProfileDirectoryResult};
