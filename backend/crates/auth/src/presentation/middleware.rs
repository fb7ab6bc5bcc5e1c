//! Request Gate
//!
//! Admits a request only with a valid bearer token and hands the resolved
//! [`Identity`] to downstream handlers through the request extensions.
//! Every rejection looks the same to the caller; the reason is logged.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use platform::bearer::extract_bearer;
use std::sync::Arc;

use crate::application::token::TokenService;
use crate::domain::identity::Identity;
use crate::error::AuthError;

/// Gate state
#[derive(Clone)]
pub struct GateState {
    pub tokens: Arc<TokenService>,
}

/// Middleware that requires a valid bearer token
pub async fn require_identity(
    State(gate): State<GateState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = extract_bearer(req.headers()).map_err(|reason| {
        tracing::warn!(reason = %reason, path = %req.uri().path(), "Gate rejected request");
        AuthError::Unauthorized
    })?;

    let identity = gate.tokens.validate(token).map_err(|reason| {
        tracing::warn!(reason = %reason, path = %req.uri().path(), "Gate rejected token");
        AuthError::Unauthorized
    })?;

    tracing::debug!(
        subject_id = %identity.subject_id,
        role = %identity.role,
        "Gate admitted request"
    );

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

/// Handlers behind the gate take `Identity` as an extractor
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .copied()
            .ok_or(AuthError::Unauthorized)
    }
}
