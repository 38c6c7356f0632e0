//! Domain model for marketplace profiles.

mod profile;

pub use profile::{
    ParseProfileRoleError, PersistedProfileData, Profile, ProfileDomainError, ProfileId,
    ProfileRole,
};
