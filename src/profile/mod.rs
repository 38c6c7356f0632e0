//! Profile directory for marketplace participants.
//!
//! Profiles are bare records: the core only reads display names and roles,
//! and registration exists so the uniqueness of contact emails is enforced
//! by the store rather than by a read-then-write check.

pub mod adapters;
pub mod domain;
pub mod ports;
