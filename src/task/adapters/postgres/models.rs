//! Diesel row models for task persistence.

use crate::store::schema::tasks;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Query result and insert row for task records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task category.
    pub category: String,
    /// Short title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Budget in cents.
    pub budget_cents: i64,
    /// Where the work happens.
    pub location: String,
    /// Requested date.
    pub scheduled_for: NaiveDate,
    /// Creating customer.
    pub created_by: uuid::Uuid,
    /// Lifecycle status.
    pub status: String,
    /// Accepted provider, if matched.
    pub accepted_provider_id: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
