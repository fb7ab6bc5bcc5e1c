//! Profile Use Cases
//!
//! Read and edit the caller's own role profile. Both require the identity
//! injected by the request gate and a route role matching the caller.

use std::sync::Arc;

use crate::domain::entity::profile::{Profile, ProfileUpdate};
use crate::domain::identity::Identity;
use crate::domain::repository::{CredentialRepository, ProfileRepository};
use crate::domain::value_object::{
    display_name::DisplayName, email::Email, phone::Phone, role::Role,
};
use crate::error::{AuthError, AuthResult};

const DESCRIPTION_MAX_LENGTH: usize = 2000;
const CITY_MAX_LENGTH: usize = 100;
const SPECIALIZATION_MAX_LENGTH: usize = 64;
const SPECIALIZATIONS_MAX_COUNT: usize = 20;

/// Profile together with the owning credential's email
#[derive(Debug, Clone)]
pub struct ProfileView {
    pub email: Email,
    pub profile: Profile,
}

fn ensure_role(identity: &Identity, expected: Role) -> AuthResult<()> {
    if identity.role != expected {
        tracing::debug!(
            subject_id = %identity.subject_id,
            role = %identity.role,
            expected = %expected,
            "Role mismatch on profile route"
        );
        return Err(AuthError::Forbidden);
    }
    Ok(())
}

// ============================================================================
// Get Profile
// ============================================================================

pub struct GetProfileUseCase<R>
where
    R: CredentialRepository + ProfileRepository,
{
    repo: Arc<R>,
}

impl<R> GetProfileUseCase<R>
where
    R: CredentialRepository + ProfileRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Load the caller's profile from the `role` profile table
    ///
    /// A token can outlive its subject, so a missing credential or profile
    /// is `ProfileNotFound` rather than an internal error.
    pub async fn execute(&self, identity: &Identity, role: Role) -> AuthResult<ProfileView> {
        ensure_role(identity, role)?;

        let credential = self
            .repo
            .find_by_id(&identity.subject_id)
            .await?
            .ok_or(AuthError::ProfileNotFound)?;

        let profile = self
            .repo
            .find_by_subject(&identity.subject_id, role)
            .await?
            .ok_or(AuthError::ProfileNotFound)?;

        Ok(ProfileView {
            email: credential.email,
            profile,
        })
    }
}

// ============================================================================
// Update Profile
// ============================================================================

/// Update profile input
pub enum UpdateProfileInput {
    Client {
        name: String,
        phone: Option<String>,
    },
    Master {
        name: String,
        description: String,
        city: String,
        specializations: Vec<String>,
        price_from: i64,
    },
}

impl UpdateProfileInput {
    fn role(&self) -> Role {
        match self {
            UpdateProfileInput::Client { .. } => Role::Client,
            UpdateProfileInput::Master { .. } => Role::Master,
        }
    }

    fn validate(self) -> AuthResult<ProfileUpdate> {
        match self {
            UpdateProfileInput::Client { name, phone } => Ok(ProfileUpdate::Client {
                name: DisplayName::new(name)?,
                phone: Phone::parse_optional(phone)?,
            }),
            UpdateProfileInput::Master {
                name,
                description,
                city,
                specializations,
                price_from,
            } => Ok(ProfileUpdate::Master {
                name: DisplayName::new(name)?,
                description: bounded_text("Description", description, DESCRIPTION_MAX_LENGTH)?,
                city: bounded_text("City", city, CITY_MAX_LENGTH)?,
                specializations: normalize_specializations(specializations)?,
                price_from: i32::try_from(price_from)
                    .ok()
                    .filter(|price| *price >= 0)
                    .ok_or_else(|| {
                        AuthError::InvalidInput(
                            "Starting price must be a non-negative whole number".to_string(),
                        )
                    })?,
            }),
        }
    }
}

fn bounded_text(field: &str, value: String, max: usize) -> AuthResult<String> {
    let value = value.trim();
    if value.chars().count() > max {
        return Err(AuthError::InvalidInput(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(value.to_string())
}

/// Trim, drop blanks and duplicates, keep first-seen order
fn normalize_specializations(raw: Vec<String>) -> AuthResult<Vec<String>> {
    let mut specializations: Vec<String> = Vec::with_capacity(raw.len());

    for item in raw {
        let item = item.trim();
        if item.is_empty() || specializations.iter().any(|s| s == item) {
            continue;
        }
        if item.chars().count() > SPECIALIZATION_MAX_LENGTH {
            return Err(AuthError::InvalidInput(format!(
                "Each specialization must be at most {} characters",
                SPECIALIZATION_MAX_LENGTH
            )));
        }
        specializations.push(item.to_string());
    }

    if specializations.len() > SPECIALIZATIONS_MAX_COUNT {
        return Err(AuthError::InvalidInput(format!(
            "At most {} specializations are allowed",
            SPECIALIZATIONS_MAX_COUNT
        )));
    }

    Ok(specializations)
}

pub struct UpdateProfileUseCase<R>
where
    R: CredentialRepository + ProfileRepository,
{
    repo: Arc<R>,
}

impl<R> UpdateProfileUseCase<R>
where
    R: CredentialRepository + ProfileRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        identity: &Identity,
        input: UpdateProfileInput,
    ) -> AuthResult<ProfileView> {
        ensure_role(identity, input.role())?;
        let update = input.validate()?;

        let credential = self
            .repo
            .find_by_id(&identity.subject_id)
            .await?
            .ok_or(AuthError::ProfileNotFound)?;

        let profile = self
            .repo
            .update_profile(&identity.subject_id, update)
            .await?
            .ok_or(AuthError::ProfileNotFound)?;

        tracing::info!(
            subject_id = %identity.subject_id,
            role = %identity.role,
            "Profile updated"
        );

        Ok(ProfileView {
            email: credential.email,
            profile,
        })
    }
}
