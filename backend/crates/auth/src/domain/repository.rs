//! Repository Traits
//!
//! Interfaces for data persistence. Implementations live in the
//! infrastructure layer.

use crate::domain::entity::{
    credential::Credential,
    profile::{Profile, ProfileUpdate},
};
use crate::domain::value_object::{email::Email, role::Role, subject_id::SubjectId};
use crate::error::AuthResult;

/// Credential store
#[trait_variant::make(CredentialRepository: Send)]
pub trait LocalCredentialRepository {
    /// Persist a credential and its profile stub as one atomic unit
    ///
    /// Either both rows exist afterwards or neither does. A second active
    /// credential with the same email fails with `AuthError::DuplicateEmail`,
    /// including when two registrations race.
    async fn create(&self, credential: &Credential, profile: &Profile) -> AuthResult<()>;

    /// Find an active credential by (normalized) email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Credential>>;

    /// Find an active credential by subject id
    async fn find_by_id(&self, subject_id: &SubjectId) -> AuthResult<Option<Credential>>;

    /// Check if an active credential uses this email
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;
}

/// Role-specific profile store
#[trait_variant::make(ProfileRepository: Send)]
pub trait LocalProfileRepository {
    /// Load the profile of an active subject in the given role's table
    async fn find_by_subject(
        &self,
        subject_id: &SubjectId,
        role: Role,
    ) -> AuthResult<Option<Profile>>;

    /// Overwrite the editable profile fields; `None` when there is no such
    /// profile for an active subject
    async fn update_profile(
        &self,
        subject_id: &SubjectId,
        update: ProfileUpdate,
    ) -> AuthResult<Option<Profile>>;
}
