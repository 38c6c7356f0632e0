//! Chat fabric for the marketplace.
//!
//! Every offer owns exactly one chat between the task's customer and the
//! bidding provider. Chats start active; once an offer is accepted the other
//! chats on the task are deactivated and stop taking user messages, while
//! system and offer-update messages may still be appended. Messages are
//! append-only apart from their read flag.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
