//! Directory port for profile lookup and registration.

use crate::profile::domain::{Profile, ProfileId, ProfileRole};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Result type for profile directory operations.
pub type ProfileDirectoryResult<T> = Result<T, ProfileDirectoryError>;

/// Profile lookup contract consumed by the marketplace core.
#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    /// Registers a new profile.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileDirectoryError::DuplicateEmail`] when the email is
    /// already registered.
    async fn register(&self, profile: &Profile) -> ProfileDirectoryResult<()>;

    /// Finds a profile by identifier.
    async fn find_by_id(&self, id: ProfileId) -> ProfileDirectoryResult<Option<Profile>>;

    /// Resolves display names for the given identifiers.
    ///
    /// Unknown identifiers are omitted from the returned map.
    async fn display_names(
        &self,
        ids: &[ProfileId],
    ) -> ProfileDirectoryResult<HashMap<ProfileId, String>>;

    /// Lists every profile holding `role`.
    async fn list_by_role(&self, role: ProfileRole) -> ProfileDirectoryResult<Vec<Profile>>;
}

/// Errors returned by profile directory implementations.
#[derive(Debug, Clone, Error)]
pub enum ProfileDirectoryError {
    /// A profile with the same identifier already exists.
    #[error("duplicate profile identifier: {0}")]
    DuplicateProfile(ProfileId),

    /// A profile with the same email already exists.
    #[error("email already registered: {0}")]
    DuplicateEmail(String),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProfileDirectoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
