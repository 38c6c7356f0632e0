//! Port contracts for the offer engine.

pub mod repository;

pub use repository::{OfferPlacement, OfferRepository, OfferRepositoryError, OfferRepositoryResult};
