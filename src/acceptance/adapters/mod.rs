//! Adapter implementations for the acceptance repository port.

pub mod memory;
pub mod postgres;
