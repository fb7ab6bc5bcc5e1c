//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::TokenService;
use crate::application::{
    GetProfileUseCase, SignInInput, SignInUseCase, SignUpInput, SignUpUseCase,
    UpdateProfileInput, UpdateProfileUseCase,
};
use crate::domain::identity::Identity;
use crate::domain::repository::{CredentialRepository, ProfileRepository};
use crate::domain::value_object::role::Role;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    LoginRequest, LoginResponse, ProfileResponse, RegisterRequest, RegisterResponse,
    UpdateClientProfileRequest, UpdateMasterProfileRequest,
};

/// Shared state for auth handlers
pub struct AuthAppState<R> {
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub tokens: Arc<TokenService>,
}

impl<R> Clone for AuthAppState<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
            tokens: self.tokens.clone(),
        }
    }
}

/// Unreadable bodies are the caller's problem, reported like any other bad field
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AuthResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AuthError::InvalidInput(rejection.body_text()))
}

// ============================================================================
// Register / Login
// ============================================================================

/// POST /api/auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AuthResult<Json<RegisterResponse>>
where
    R: CredentialRepository + Send + Sync + 'static,
{
    let req = json_body(payload)?;
    let use_case = SignUpUseCase::new(
        state.repo.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(SignUpInput {
            name: req.name,
            email: req.email,
            password: req.password,
            phone: req.phone,
            role: req.role,
        })
        .await?;

    Ok(Json(RegisterResponse {
        status: "ok",
        token: output.token,
        subject_id: output.subject_id.to_string(),
        role: output.role,
        email: output.email.as_str().to_string(),
    }))
}

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AuthResult<Json<LoginResponse>>
where
    R: CredentialRepository + Send + Sync + 'static,
{
    let req = json_body(payload)?;
    let use_case = SignInUseCase::new(
        state.repo.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(SignInInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(LoginResponse {
        token: output.token,
        role: output.role,
        subject_id: output.subject_id.to_string(),
    }))
}

/// GET /api/auth/me
///
/// A valid token for a subject that no longer exists is not an identity.
pub async fn me<R>(
    State(state): State<AuthAppState<R>>,
    identity: Identity,
) -> AuthResult<Json<Identity>>
where
    R: CredentialRepository + Send + Sync + 'static,
{
    if state.repo.find_by_id(&identity.subject_id).await?.is_none() {
        tracing::warn!(subject_id = %identity.subject_id, "Token refers to a missing subject");
        return Err(AuthError::Unauthorized);
    }

    Ok(Json(identity))
}

// ============================================================================
// Profiles
// ============================================================================

async fn get_profile<R>(
    state: AuthAppState<R>,
    identity: Identity,
    role: Role,
) -> AuthResult<Json<ProfileResponse>>
where
    R: CredentialRepository + ProfileRepository + Send + Sync + 'static,
{
    let view = GetProfileUseCase::new(state.repo.clone())
        .execute(&identity, role)
        .await?;

    Ok(Json(view.into()))
}

async fn update_profile<R>(
    state: AuthAppState<R>,
    identity: Identity,
    input: UpdateProfileInput,
) -> AuthResult<Json<ProfileResponse>>
where
    R: CredentialRepository + ProfileRepository + Send + Sync + 'static,
{
    let view = UpdateProfileUseCase::new(state.repo.clone())
        .execute(&identity, input)
        .await?;

    Ok(Json(view.into()))
}

/// GET /api/client/profile
pub async fn get_client_profile<R>(
    State(state): State<AuthAppState<R>>,
    identity: Identity,
) -> AuthResult<Json<ProfileResponse>>
where
    R: CredentialRepository + ProfileRepository + Send + Sync + 'static,
{
    get_profile(state, identity, Role::Client).await
}

/// PUT /api/client/profile
pub async fn update_client_profile<R>(
    State(state): State<AuthAppState<R>>,
    identity: Identity,
    payload: Result<Json<UpdateClientProfileRequest>, JsonRejection>,
) -> AuthResult<Json<ProfileResponse>>
where
    R: CredentialRepository + ProfileRepository + Send + Sync + 'static,
{
    let req = json_body(payload)?;
    let input = UpdateProfileInput::Client {
        name: req.name,
        phone: req.phone,
    };

    update_profile(state, identity, input).await
}

/// GET /api/master/profile
pub async fn get_master_profile<R>(
    State(state): State<AuthAppState<R>>,
    identity: Identity,
) -> AuthResult<Json<ProfileResponse>>
where
    R: CredentialRepository + ProfileRepository + Send + Sync + 'static,
{
    get_profile(state, identity, Role::Master).await
}

/// PUT /api/master/profile
pub async fn update_master_profile<R>(
    State(state): State<AuthAppState<R>>,
    identity: Identity,
    payload: Result<Json<UpdateMasterProfileRequest>, JsonRejection>,
) -> AuthResult<Json<ProfileResponse>>
where
    R: CredentialRepository + ProfileRepository + Send + Sync + 'static,
{
    let req = json_body(payload)?;
    let input = UpdateProfileInput::Master {
        name: req.name,
        description: req.description,
        city: req.city,
        specializations: req.specializations,
        price_from: req.price_from,
    };

    update_profile(state, identity, input).await
}
