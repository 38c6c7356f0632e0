//! In-memory adapters for the offer engine.

mod offer;

pub use offer::InMemoryOfferRepository;
