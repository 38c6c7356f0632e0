//! Acceptance coordinator.
//!
//! Accepting an offer is the only operation that changes several entity
//! types after creation. In one all-or-nothing unit it:
//!
//! - moves the task to `ACCEPTED` and records the provider
//! - accepts the offer and rejects every other offer on the task
//! - deactivates every other chat on the task
//! - posts a system message to the accepted offer's chat
//!
//! Concurrent accepts on the same task are serialised by the store; exactly
//! one succeeds and the others see a conflict.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
