//! Diesel row models for profile persistence.

use crate::store::schema::profiles;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result and insert row for profile records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProfileRow {
    /// Profile identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub full_name: String,
    /// Normalized email.
    pub email: String,
    /// Marketplace role.
    pub role: String,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}
