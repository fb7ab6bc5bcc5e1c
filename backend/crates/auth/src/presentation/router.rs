//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::TokenService;
use crate::domain::repository::{CredentialRepository, ProfileRepository};
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{GateState, require_identity};

/// Create the auth router for any repository implementation
///
/// Paths are relative; the binary nests this under `/api`.
/// - public: `POST /auth/register`, `POST /auth/login`
/// - behind the gate: `GET /auth/me`, `GET|PUT /client/profile`,
///   `GET|PUT /master/profile`
pub fn auth_router<R>(repo: Arc<R>, config: AuthConfig) -> Router
where
    R: CredentialRepository + ProfileRepository + Send + Sync + 'static,
{
    let config = Arc::new(config);
    let tokens = Arc::new(TokenService::new(&config));

    let state = AuthAppState {
        repo,
        config,
        tokens: tokens.clone(),
    };
    let gate = GateState { tokens };

    let protected = Router::new()
        .route("/auth/me", get(handlers::me::<R>))
        .route(
            "/client/profile",
            get(handlers::get_client_profile::<R>).put(handlers::update_client_profile::<R>),
        )
        .route(
            "/master/profile",
            get(handlers::get_master_profile::<R>).put(handlers::update_master_profile::<R>),
        )
        .route_layer(middleware::from_fn_with_state(gate, require_identity));

    Router::new()
        .route("/auth/register", post(handlers::register::<R>))
        .route("/auth/login", post(handlers::login::<R>))
        .merge(protected)
        .with_state(state)
}
