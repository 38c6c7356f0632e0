//! Application services for offers.

mod offer;

pub use offer::{
    CreateOfferRequest, OfferListing, OfferService, OfferServiceError, OfferServiceResult,
    PlacedOffer, UpdateOfferRequest,
};
