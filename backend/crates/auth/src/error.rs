//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::bearer::BearerError;
use platform::jwt::JwtError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing or malformed request field; the message is user-facing
    #[error("{0}")]
    InvalidInput(String),

    #[error("Email is already registered")]
    DuplicateEmail,

    /// No active credential with this email
    #[error("User not found")]
    UserNotFound,

    /// Password does not match the stored hash
    #[error("Invalid credentials")]
    BadCredentials,

    #[error("Token has expired")]
    TokenExpired,

    /// Malformed structure, bad signature, wrong algorithm or missing claim
    #[error("Token is invalid: {0}")]
    InvalidToken(String),

    /// Uniform rejection at the request gate
    #[error("Authentication required")]
    Unauthorized,

    /// Authenticated, but the route belongs to the other role
    #[error("This resource is not available for your role")]
    Forbidden,

    #[error("Profile not found")]
    ProfileNotFound,

    #[error("Persistence failure: {0}")]
    Persistence(String),

    /// Database pool exhausted or unreachable
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AuthError::DuplicateEmail => StatusCode::CONFLICT,
            AuthError::UserNotFound
            | AuthError::BadCredentials
            | AuthError::TokenExpired
            | AuthError::InvalidToken(_)
            | AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::ProfileNotFound => StatusCode::NOT_FOUND,
            AuthError::Persistence(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AuthError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidInput(_) => ErrorKind::BadRequest,
            AuthError::DuplicateEmail => ErrorKind::Conflict,
            AuthError::UserNotFound
            | AuthError::BadCredentials
            | AuthError::TokenExpired
            | AuthError::InvalidToken(_)
            | AuthError::Unauthorized => ErrorKind::Unauthorized,
            AuthError::Forbidden => ErrorKind::Forbidden,
            AuthError::ProfileNotFound => ErrorKind::NotFound,
            AuthError::Persistence(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
            AuthError::StoreUnavailable(_) => ErrorKind::ServiceUnavailable,
        }
    }

    /// Convert to AppError
    ///
    /// Server-side details stay in the logs; the client gets a generic message.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::InvalidInput(msg) => AppError::bad_request(msg.clone()),
            AuthError::DuplicateEmail => AppError::new(self.kind(), self.to_string())
                .with_action("Sign in or register with another email"),
            AuthError::UserNotFound | AuthError::BadCredentials => {
                AppError::new(self.kind(), self.to_string())
                    .with_action("Check your email and password")
            }
            AuthError::TokenExpired | AuthError::InvalidToken(_) | AuthError::Unauthorized => {
                AppError::unauthorized("Authentication required").with_action("Sign in again")
            }
            AuthError::Persistence(_) | AuthError::Internal(_) => {
                AppError::internal("Something went wrong").with_action("Try again later")
            }
            AuthError::StoreUnavailable(_) => {
                AppError::service_unavailable("Service is temporarily unavailable")
                    .with_action("Try again later")
            }
            AuthError::Forbidden | AuthError::ProfileNotFound => {
                AppError::new(self.kind(), self.to_string())
            }
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Persistence(msg) => {
                tracing::error!(message = %msg, "Auth persistence failure");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::StoreUnavailable(msg) => {
                tracing::error!(message = %msg, "Auth store unavailable");
            }
            AuthError::BadCredentials | AuthError::UserNotFound => {
                tracing::warn!(error = %self, "Failed login attempt");
            }
            AuthError::TokenExpired | AuthError::InvalidToken(_) | AuthError::Unauthorized => {
                tracing::warn!(error = %self, "Request rejected at auth gate");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

/// Value objects report validation failures as `BadRequest`
impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest => {
                AuthError::InvalidInput(err.message().to_string())
            }
            _ => AuthError::Internal(err.to_string()),
        }
    }
}

/// Classified by the kernel mapping; only availability is told apart
impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        let detail = err.to_string();
        match AppError::from(err).kind() {
            ErrorKind::ServiceUnavailable => AuthError::StoreUnavailable(detail),
            _ => AuthError::Persistence(detail),
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Encoding(msg) => AuthError::Internal(msg),
            other => AuthError::InvalidToken(other.to_string()),
        }
    }
}

impl From<BearerError> for AuthError {
    fn from(_: BearerError) -> Self {
        AuthError::Unauthorized
    }
}
