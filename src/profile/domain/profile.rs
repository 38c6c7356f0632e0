//! Profile record, identifier, and role.

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(Uuid);

impl ProfileId {
    /// Creates a new time-ordered profile identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a profile identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for ProfileId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Marketplace role of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProfileRole {
    /// Posts tasks and accepts offers.
    Customer,
    /// Bids on tasks.
    ServiceProvider,
}

impl ProfileRole {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "CUSTOMER",
            Self::ServiceProvider => "SERVICE_PROVIDER",
        }
    }
}

impl TryFrom<&str> for ProfileRole {
    type Error = ParseProfileRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "CUSTOMER" => Ok(Self::Customer),
            "SERVICE_PROVIDER" => Ok(Self::ServiceProvider),
            _ => Err(ParseProfileRoleError(value.to_owned())),
        }
    }
}

/// Error returned while parsing a profile role.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown profile role: {0}")]
pub struct ParseProfileRoleError(pub String);

/// Errors returned while constructing profiles.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProfileDomainError {
    /// The full name is empty after trimming.
    #[error("full name must not be empty")]
    EmptyFullName,

    /// The email does not look like `local@domain`.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),
}

/// Marketplace participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    id: ProfileId,
    full_name: String,
    email: String,
    role: ProfileRole,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProfileData {
    /// Persisted identifier.
    pub id: ProfileId,
    /// Persisted display name.
    pub full_name: String,
    /// Persisted email.
    pub email: String,
    /// Persisted role.
    pub role: ProfileRole,
    /// Persisted registration timestamp.
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Creates a validated profile.
    ///
    /// Emails are trimmed and lower-cased so uniqueness is case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileDomainError`] when the name is blank or the email is
    /// malformed.
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        role: ProfileRole,
        clock: &impl Clock,
    ) -> Result<Self, ProfileDomainError> {
        let raw_name = full_name.into();
        let name = raw_name.trim();
        if name.is_empty() {
            return Err(ProfileDomainError::EmptyFullName);
        }

        let raw_email = email.into();
        let normalized = raw_email.trim().to_ascii_lowercase();
        let valid_email = normalized
            .split_once('@')
            .is_some_and(|(local, domain)| {
                !local.is_empty() && !domain.is_empty() && !domain.contains('@')
            });
        if !valid_email || normalized.chars().any(char::is_whitespace) {
            return Err(ProfileDomainError::InvalidEmail(raw_email));
        }

        Ok(Self {
            id: ProfileId::new(),
            full_name: name.to_owned(),
            email: normalized,
            role,
            created_at: clock.utc(),
        })
    }

    /// Reconstructs a profile from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProfileData) -> Self {
        Self {
            id: data.id,
            full_name: data.full_name,
            email: data.email,
            role: data.role,
            created_at: data.created_at,
        }
    }

    /// Returns the profile identifier.
    #[must_use]
    pub const fn id(&self) -> ProfileId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Returns the normalized email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the marketplace role.
    #[must_use]
    pub const fn role(&self) -> ProfileRole {
        self.role
    }

    /// Returns the registration timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
