//! Domain types for offer acceptance.

mod acceptance;

pub use acceptance::{AcceptOffer, AcceptedOffer};
