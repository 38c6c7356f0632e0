//! `PostgreSQL` profile directory implementation.

use super::models::ProfileRow;
use crate::profile::{
    domain::{PersistedProfileData, Profile, ProfileId, ProfileRole},
    ports::{ProfileDirectory, ProfileDirectoryError, ProfileDirectoryResult},
};
use crate::store::postgres::{PgPool, get_conn_with, run_blocking_with, unique_violation};
use crate::store::schema::profiles;
use async_trait::async_trait;
use diesel::prelude::*;
use std::collections::HashMap;

const EMAIL_UNIQUE_CONSTRAINT: &str = "profiles_email_unique";

/// `PostgreSQL`-backed profile directory.
#[derive(Debug, Clone)]
pub struct PostgresProfileDirectory {
    pool: PgPool,
}

impl PostgresProfileDirectory {
    /// Creates a new directory from a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ProfileDirectoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ProfileDirectoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        run_blocking_with(
            move || {
                let mut connection = get_conn_with(&pool, ProfileDirectoryError::persistence)?;
                f(&mut connection)
            },
            ProfileDirectoryError::persistence,
        )
        .await
    }
}

#[async_trait]
impl ProfileDirectory for PostgresProfileDirectory {
    async fn register(&self, profile: &Profile) -> ProfileDirectoryResult<()> {
        let row = ProfileRow {
            id: profile.id().into_inner(),
            full_name: profile.full_name().to_owned(),
            email: profile.email().to_owned(),
            role: profile.role().as_str().to_owned(),
            created_at: profile.created_at(),
        };
        let profile_id = profile.id();

        self.run_blocking(move |connection| {
            diesel::insert_into(profiles::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match unique_violation(&err).as_deref() {
                    Some(EMAIL_UNIQUE_CONSTRAINT) => {
                        ProfileDirectoryError::DuplicateEmail(row.email.clone())
                    }
                    Some(_) => ProfileDirectoryError::DuplicateProfile(profile_id),
                    None => ProfileDirectoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: ProfileId) -> ProfileDirectoryResult<Option<Profile>> {
        self.run_blocking(move |connection| {
            profiles::table
                .find(id.into_inner())
                .select(ProfileRow::as_select())
                .first::<ProfileRow>(connection)
                .optional()
                .map_err(ProfileDirectoryError::persistence)?
                .map(row_to_profile)
                .transpose()
        })
        .await
    }

    async fn display_names(
        &self,
        ids: &[ProfileId],
    ) -> ProfileDirectoryResult<HashMap<ProfileId, String>> {
        let uuids: Vec<uuid::Uuid> = ids.iter().map(|id| id.into_inner()).collect();
        self.run_blocking(move |connection| {
            let rows = profiles::table
                .filter(profiles::id.eq_any(uuids))
                .select((profiles::id, profiles::full_name))
                .load::<(uuid::Uuid, String)>(connection)
                .map_err(ProfileDirectoryError::persistence)?;
            Ok(rows
                .into_iter()
                .map(|(id, name)| (ProfileId::from_uuid(id), name))
                .collect())
        })
        .await
    }

    async fn list_by_role(&self, role: ProfileRole) -> ProfileDirectoryResult<Vec<Profile>> {
        self.run_blocking(move |connection| {
            profiles::table
                .filter(profiles::role.eq(role.as_str()))
                .order(profiles::id.asc())
                .select(ProfileRow::as_select())
                .load::<ProfileRow>(connection)
                .map_err(ProfileDirectoryError::persistence)?
                .into_iter()
                .map(row_to_profile)
                .collect()
        })
        .await
    }
}

fn row_to_profile(row: ProfileRow) -> ProfileDirectoryResult<Profile> {
    let role = ProfileRole::try_from(row.role.as_str()).map_err(ProfileDirectoryError::persistence)?;
    Ok(Profile::from_persisted(PersistedProfileData {
        id: ProfileId::from_uuid(row.id),
        full_name: row.full_name,
        email: row.email,
        role,
        created_at: row.created_at,
    }))
}
