//! Step definitions for offer acceptance scenarios.

mod given;
mod then;
mod when;
pub mod world;
