//! Sign In Use Case
//!
//! Verifies email and password and issues a fresh token. Earlier tokens
//! stay valid until they expire.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::TokenService;
use crate::domain::repository::CredentialRepository;
use crate::domain::value_object::{
    email::Email, role::Role, subject_id::SubjectId, user_password::RawPassword,
};
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in output
#[derive(Debug)]
pub struct SignInOutput {
    pub subject_id: SubjectId,
    pub role: Role,
    pub token: String,
}

/// Sign in use case
pub struct SignInUseCase<R>
where
    R: CredentialRepository,
{
    repo: Arc<R>,
    tokens: Arc<TokenService>,
    config: Arc<AuthConfig>,
}

impl<R> SignInUseCase<R>
where
    R: CredentialRepository,
{
    pub fn new(repo: Arc<R>, tokens: Arc<TokenService>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            tokens,
            config,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        if input.email.trim().is_empty() {
            return Err(AuthError::InvalidInput("Email is required".to_string()));
        }
        let raw_password = RawPassword::for_verification(input.password)?;

        // An address that cannot be valid cannot be registered either
        let Ok(email) = Email::new(input.email) else {
            return Err(AuthError::UserNotFound);
        };

        let credential = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !credential
            .password
            .verify(&raw_password, self.config.pepper())
        {
            return Err(AuthError::BadCredentials);
        }

        let token = self.tokens.issue(credential.subject_id, credential.role)?;

        tracing::info!(
            subject_id = %credential.subject_id,
            role = %credential.role,
            "Subject signed in"
        );

        Ok(SignInOutput {
            subject_id: credential.subject_id,
            role: credential.role,
            token,
        })
    }
}
