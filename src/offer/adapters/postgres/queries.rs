//! Offer statements reused inside multi-table transactions.

use super::models::OfferRow;
use crate::money::Money;
use crate::offer::domain::{Offer, OfferId, OfferStatus, PersistedOfferData};
use crate::profile::domain::ProfileId;
use crate::store::schema::offers;
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Reads an offer row without locking it.
pub(crate) fn find(connection: &mut PgConnection, id: OfferId) -> QueryResult<Option<OfferRow>> {
    offers::table
        .find(id.into_inner())
        .select(OfferRow::as_select())
        .first::<OfferRow>(connection)
        .optional()
}

/// Reads an offer row and locks it until commit.
pub(crate) fn lock_for_update(
    connection: &mut PgConnection,
    id: OfferId,
) -> QueryResult<Option<OfferRow>> {
    offers::table
        .find(id.into_inner())
        .select(OfferRow::as_select())
        .for_update()
        .first::<OfferRow>(connection)
        .optional()
}

/// Marks a pending offer accepted. Returns the number of rows changed.
pub(crate) fn mark_accepted(
    connection: &mut PgConnection,
    id: OfferId,
    timestamp: DateTime<Utc>,
) -> QueryResult<usize> {
    diesel::update(
        offers::table
            .filter(offers::id.eq(id.into_inner()))
            .filter(offers::status.eq(OfferStatus::Pending.as_str())),
    )
    .set((
        offers::status.eq(OfferStatus::Accepted.as_str()),
        offers::updated_at.eq(timestamp),
    ))
    .execute(connection)
}

/// Rejects every offer on `task_id` other than `keep`. Returns the number
/// of rows changed.
pub(crate) fn reject_others(
    connection: &mut PgConnection,
    task_id: TaskId,
    keep: OfferId,
    timestamp: DateTime<Utc>,
) -> QueryResult<usize> {
    diesel::update(
        offers::table
            .filter(offers::task_id.eq(task_id.into_inner()))
            .filter(offers::id.ne(keep.into_inner()))
            .filter(offers::status.ne(OfferStatus::Rejected.as_str())),
    )
    .set((
        offers::status.eq(OfferStatus::Rejected.as_str()),
        offers::updated_at.eq(timestamp),
    ))
    .execute(connection)
}

/// Builds an insert row from an offer.
pub(crate) fn to_row(offer: &Offer) -> OfferRow {
    OfferRow {
        id: offer.id().into_inner(),
        task_id: offer.task_id().into_inner(),
        provider_id: offer.provider_id().into_inner(),
        price_cents: offer.price().cents(),
        message: offer.message().to_owned(),
        status: offer.status().as_str().to_owned(),
        created_at: offer.created_at(),
        updated_at: offer.updated_at(),
    }
}

/// Error raised when a stored row violates domain rules.
#[derive(Debug, thiserror::Error)]
#[error("corrupt offer row {id}: {reason}")]
pub(crate) struct CorruptOfferRow {
    id: uuid::Uuid,
    reason: String,
}

/// Reconstructs an offer from a stored row.
pub(crate) fn row_to_offer(row: OfferRow) -> Result<Offer, CorruptOfferRow> {
    let corrupt = |reason: String| CorruptOfferRow { id: row.id, reason };
    let status =
        OfferStatus::try_from(row.status.as_str()).map_err(|err| corrupt(err.to_string()))?;
    let price = Money::from_cents(row.price_cents).map_err(|err| corrupt(err.to_string()))?;

    Ok(Offer::from_persisted(PersistedOfferData {
        id: OfferId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        provider_id: ProfileId::from_uuid(row.provider_id),
        price,
        message: row.message,
        status,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}
