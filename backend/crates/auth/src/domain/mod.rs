//! Domain Layer
//!
//! Contains entities, value objects, the request identity and repository
//! traits.

pub mod entity;
pub mod identity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{
    credential::Credential,
    profile::{ClientProfile, MasterProfile, Profile, ProfileUpdate},
};
pub use identity::Identity;
pub use repository::{CredentialRepository, ProfileRepository};
