//! Adapter implementations for the offer repository port.

pub mod memory;
pub mod postgres;
