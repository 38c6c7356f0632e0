//! Error types for offer domain validation.

use super::{OfferId, OfferStatus};
use crate::money::MoneyError;
use thiserror::Error;

/// Errors returned while constructing or mutating offers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OfferDomainError {
    /// The offered price is not a positive amount.
    #[error("invalid offered price: {0}")]
    InvalidPrice(#[from] MoneyError),

    /// A revision supplied neither a price nor a message.
    #[error("an offer update needs a price or a message")]
    EmptyRevision,

    /// The offer has already been resolved.
    #[error("offer {offer_id} is already {status}")]
    NotPending {
        /// The offer being acted on.
        offer_id: OfferId,
        /// Its current status.
        status: OfferStatus,
    },
}

/// Error returned while parsing offer statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown offer status: {0}")]
pub struct ParseOfferStatusError(pub String);
