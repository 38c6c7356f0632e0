//! Task store for the marketplace.
//!
//! Tasks are posted by customers in `OPEN` status and are the anchor every
//! offer and chat attaches to. The acceptance coordinator moves a task to
//! `ACCEPTED`; later moves go through [`services::TaskLifecycleService`]
//! under the configured [`domain::TransitionPolicy`]. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
