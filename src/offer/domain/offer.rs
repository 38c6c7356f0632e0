//! Offer aggregate and revisions.

use super::{OfferDomainError, OfferId, OfferStatus};
use crate::money::Money;
use crate::profile::domain::ProfileId;
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A provider's bid on a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    id: OfferId,
    task_id: TaskId,
    provider_id: ProfileId,
    price: Money,
    message: String,
    status: OfferStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedOfferData {
    /// Persisted offer identifier.
    pub id: OfferId,
    /// Persisted parent task.
    pub task_id: TaskId,
    /// Persisted bidding provider.
    pub provider_id: ProfileId,
    /// Persisted offered price.
    pub price: Money,
    /// Persisted note.
    pub message: String,
    /// Persisted resolution status.
    pub status: OfferStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Fields a provider may change on a pending offer.
///
/// At least one field is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferRevision {
    price: Option<Money>,
    message: Option<String>,
}

impl OfferRevision {
    /// Creates a revision from the supplied fields.
    ///
    /// # Errors
    ///
    /// Returns [`OfferDomainError::EmptyRevision`] when both are absent.
    pub fn new(
        price: Option<Money>,
        message: Option<String>,
    ) -> Result<Self, OfferDomainError> {
        if price.is_none() && message.is_none() {
            return Err(OfferDomainError::EmptyRevision);
        }
        Ok(Self { price, message })
    }

    /// Returns the new price, if supplied.
    #[must_use]
    pub const fn price(&self) -> Option<Money> {
        self.price
    }

    /// Returns the new message, if supplied.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl Offer {
    /// Creates a pending offer.
    ///
    /// The note is stored as given; an empty note is allowed.
    #[must_use]
    pub fn new(
        task_id: TaskId,
        provider_id: ProfileId,
        price: Money,
        message: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: OfferId::new(),
            task_id,
            provider_id,
            price,
            message: message.into(),
            status: OfferStatus::Pending,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs an offer from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedOfferData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            provider_id: data.provider_id,
            price: data.price,
            message: data.message,
            status: data.status,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the offer identifier.
    #[must_use]
    pub const fn id(&self) -> OfferId {
        self.id
    }

    /// Returns the parent task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the bidding provider.
    #[must_use]
    pub const fn provider_id(&self) -> ProfileId {
        self.provider_id
    }

    /// Returns the offered price.
    #[must_use]
    pub const fn price(&self) -> Money {
        self.price
    }

    /// Returns the provider's note.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the resolution status.
    #[must_use]
    pub const fn status(&self) -> OfferStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Fails unless the offer is still pending.
    ///
    /// # Errors
    ///
    /// Returns [`OfferDomainError::NotPending`] once the offer is resolved.
    pub const fn ensure_pending(&self) -> Result<(), OfferDomainError> {
        if matches!(self.status, OfferStatus::Pending) {
            Ok(())
        } else {
            Err(OfferDomainError::NotPending {
                offer_id: self.id,
                status: self.status,
            })
        }
    }

    /// Applies the supplied fields of `revision`, leaving the others as they
    /// were.
    ///
    /// # Errors
    ///
    /// Returns [`OfferDomainError::NotPending`] once the offer is resolved.
    pub fn revise(
        &mut self,
        revision: &OfferRevision,
        timestamp: DateTime<Utc>,
    ) -> Result<(), OfferDomainError> {
        self.ensure_pending()?;
        if let Some(price) = revision.price() {
            self.price = price;
        }
        if let Some(message) = revision.message() {
            message.clone_into(&mut self.message);
        }
        self.updated_at = timestamp;
        Ok(())
    }

    /// Resolves a pending offer as accepted.
    ///
    /// # Errors
    ///
    /// Returns [`OfferDomainError::NotPending`] once the offer is resolved.
    pub fn accept(&mut self, timestamp: DateTime<Utc>) -> Result<(), OfferDomainError> {
        self.ensure_pending()?;
        self.status = OfferStatus::Accepted;
        self.updated_at = timestamp;
        Ok(())
    }

    /// Marks the offer rejected because another offer won the task.
    ///
    /// Returns `false` when the offer was already rejected.
    pub fn reject(&mut self, timestamp: DateTime<Utc>) -> bool {
        if self.status == OfferStatus::Rejected {
            return false;
        }
        self.status = OfferStatus::Rejected;
        self.updated_at = timestamp;
        true
    }
}
