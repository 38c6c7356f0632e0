//! In-memory profile directory.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::profile::{
    domain::{Profile, ProfileId, ProfileRole},
    ports::{ProfileDirectory, ProfileDirectoryError, ProfileDirectoryResult},
};
use crate::store::InMemoryStore;

/// Profile directory over the shared in-memory tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileDirectory {
    store: InMemoryStore,
}

impl InMemoryProfileDirectory {
    /// Creates a directory sharing `store` with other adapters.
    #[must_use]
    pub const fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ProfileDirectory for InMemoryProfileDirectory {
    async fn register(&self, profile: &Profile) -> ProfileDirectoryResult<()> {
        let mut tables = self
            .store
            .write()
            .map_err(ProfileDirectoryError::persistence)?;
        if tables.profiles.contains_key(&profile.id()) {
            return Err(ProfileDirectoryError::DuplicateProfile(profile.id()));
        }
        if tables
            .profiles
            .values()
            .any(|existing| existing.email() == profile.email())
        {
            return Err(ProfileDirectoryError::DuplicateEmail(
                profile.email().to_owned(),
            ));
        }
        tables.profiles.insert(profile.id(), profile.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ProfileId) -> ProfileDirectoryResult<Option<Profile>> {
        let tables = self
            .store
            .read()
            .map_err(ProfileDirectoryError::persistence)?;
        Ok(tables.profiles.get(&id).cloned())
    }

    async fn display_names(
        &self,
        ids: &[ProfileId],
    ) -> ProfileDirectoryResult<HashMap<ProfileId, String>> {
        let tables = self
            .store
            .read()
            .map_err(ProfileDirectoryError::persistence)?;
        Ok(ids
            .iter()
            .filter_map(|id| {
                tables
                    .profiles
                    .get(id)
                    .map(|profile| (*id, profile.full_name().to_owned()))
            })
            .collect())
    }

    async fn list_by_role(&self, role: ProfileRole) -> ProfileDirectoryResult<Vec<Profile>> {
        let tables = self
            .store
            .read()
            .map_err(ProfileDirectoryError::persistence)?;
        let mut profiles: Vec<Profile> = tables
            .profiles
            .values()
            .filter(|profile| profile.role() == role)
            .cloned()
            .collect();
        profiles.sort_by_key(Profile::id);
        Ok(profiles)
    }
}
