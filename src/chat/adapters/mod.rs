//! Adapter implementations for the chat repository port.

pub mod memory;
pub mod postgres;
