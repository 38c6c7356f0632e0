//! Adapter implementations for task store ports.

pub mod memory;
pub mod postgres;
