//! Diesel row models for offer persistence.

use crate::store::schema::offers;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result and insert row for offers.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = offers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OfferRow {
    /// Offer identifier.
    pub id: uuid::Uuid,
    /// Parent task.
    pub task_id: uuid::Uuid,
    /// Bidding provider.
    pub provider_id: uuid::Uuid,
    /// Offered price in cents.
    pub price_cents: i64,
    /// Provider's note.
    pub message: String,
    /// Resolution status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Partial update applied by an offer revision.
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = offers)]
pub struct OfferRevisionChanges {
    /// New price in cents.
    pub price_cents: Option<i64>,
    /// New note.
    pub message: Option<String>,
    /// New update timestamp.
    pub updated_at: DateTime<Utc>,
}
