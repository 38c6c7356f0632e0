//! Intent-to-notify port for new tasks.
//!
//! Delivery of push notifications is outside the marketplace core; the core
//! only announces that service providers should hear about a task. The
//! bundled adapter records that intent in the logs.

pub mod adapters;
pub mod ports;
