//! Adapter implementations for the profile directory port.

pub mod memory;
pub mod postgres;
