//! Offer engine for the marketplace.
//!
//! Providers bid on open tasks. Each provider may place one offer per task;
//! placing it also opens the offer's chat with an opening message. Offers
//! stay `PENDING` until the acceptance coordinator resolves them and may be
//! revised by their owner only while pending on an open task.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
