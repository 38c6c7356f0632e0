//! Taskpanda: a local-services task marketplace.
//!
//! Customers post tasks with a budget; service providers answer with priced
//! offers; each offer opens a private chat between the two parties; and the
//! customer accepts exactly one offer, which matches the task and closes every
//! competing conversation.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence and delivery
//! - **Adapters**: In-memory and `PostgreSQL` implementations of the ports
//! - **Services**: Orchestration invoked by the excluded HTTP layer
//!
//! # Modules
//!
//! - [`task`]: Task posting, lookup, and status lifecycle
//! - [`offer`]: Offer placement, revision, and listing
//! - [`chat`]: Per-offer conversations and read tracking
//! - [`acceptance`]: Atomic offer acceptance across tasks, offers, and chats
//! - [`profile`]: Customer and provider identities
//! - [`notification`]: Provider notification on task creation
//! - [`store`]: Shared in-memory tables and the `PostgreSQL` pool
//! - [`config`]: Environment-driven settings
//! - [`error`]: Cross-context error classification
//! - [`money`]: Integer-cent monetary amounts
//! - [`telemetry`]: Tracing subscriber setup

pub mod acceptance;
pub mod chat;
pub mod config;
pub mod error;
pub mod money;
pub mod notification;
pub mod offer;
pub mod profile;
pub mod store;
pub mod task;
pub mod telemetry;
