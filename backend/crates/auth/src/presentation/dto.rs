//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::profile::ProfileView;
use crate::domain::entity::profile::Profile;
use crate::domain::value_object::role::Role;

// ============================================================================
// Register
// ============================================================================

/// Register request
///
/// Missing fields deserialize as empty so validation can name them.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    pub status: &'static str,
    pub token: String,
    pub subject_id: String,
    pub role: Role,
    pub email: String,
}

// ============================================================================
// Login
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    pub subject_id: String,
}

// ============================================================================
// Profiles
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateClientProfileRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMasterProfileRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub specializations: Vec<String>,
    #[serde(default, alias = "priceFrom")]
    pub price_from: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientProfileResponse {
    pub subject_id: String,
    pub role: Role,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MasterProfileResponse {
    pub subject_id: String,
    pub role: Role,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub description: String,
    pub city: String,
    pub specializations: Vec<String>,
    pub price_from: i32,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile of either role; `role` tells them apart
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ProfileResponse {
    Client(ClientProfileResponse),
    Master(MasterProfileResponse),
}

impl From<ProfileView> for ProfileResponse {
    fn from(view: ProfileView) -> Self {
        let email = view.email.as_str().to_string();

        match view.profile {
            Profile::Client(p) => ProfileResponse::Client(ClientProfileResponse {
                subject_id: p.subject_id.to_string(),
                role: Role::Client,
                email,
                name: p.name.as_str().to_string(),
                phone: p.phone.map(|phone| phone.as_str().to_string()),
                created_at: p.created_at,
                updated_at: p.updated_at,
            }),
            Profile::Master(p) => ProfileResponse::Master(MasterProfileResponse {
                subject_id: p.subject_id.to_string(),
                role: Role::Master,
                email,
                name: p.name.as_str().to_string(),
                phone: p.phone.map(|phone| phone.as_str().to_string()),
                description: p.description,
                city: p.city,
                specializations: p.specializations,
                price_from: p.price_from,
                rating: p.rating,
                created_at: p.created_at,
                updated_at: p.updated_at,
            }),
        }
    }
}
