//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, request identity, repository traits
//! - `application/` - Use cases, token service and configuration
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, request gate, router
//!
//! ## Features
//! - Registration of clients and masters with a role profile stub
//! - Email + password sign-in issuing stateless HS256 bearer tokens
//! - Request gate injecting a typed [`Identity`] into protected handlers
//! - Reading and editing the caller's own profile
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (tunable cost, optional pepper)
//! - Token algorithm pinned to HS256; expiry checked on every request
//! - Credential and profile rows are written in one transaction
//! - Email uniqueness enforced by the store, not by application locks

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::{AuthConfig, ConfigError, Environment, TokenSecret};
pub use application::token::TokenService;
pub use domain::identity::Identity;
pub use error::{AuthError, AuthResult};
pub use infra::{memory::InMemoryAuthRepository, postgres::PgAuthRepository};
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
