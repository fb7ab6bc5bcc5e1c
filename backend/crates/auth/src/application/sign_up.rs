//! Sign Up Use Case
//!
//! Registers a credential with its role profile and issues the first token.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::TokenService;
use crate::domain::entity::{credential::Credential, profile::Profile};
use crate::domain::repository::CredentialRepository;
use crate::domain::value_object::{
    display_name::DisplayName,
    email::Email,
    phone::Phone,
    role::Role,
    subject_id::SubjectId,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    /// Blank means "derive from the email"
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub role: String,
}

/// Sign up output
#[derive(Debug)]
pub struct SignUpOutput {
    pub subject_id: SubjectId,
    pub role: Role,
    pub email: Email,
    pub token: String,
}

/// Sign up use case
pub struct SignUpUseCase<R>
where
    R: CredentialRepository,
{
    repo: Arc<R>,
    tokens: Arc<TokenService>,
    config: Arc<AuthConfig>,
}

impl<R> SignUpUseCase<R>
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

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        let email = Email::new(input.email)?;
        let raw_password = RawPassword::new(input.password)?;
        let role: Role = input.role.parse()?;
        // Name is optional; profiles fall back to the mailbox name
        let name = match input.name.trim() {
            "" => DisplayName::new(email.local_part())?,
            name => DisplayName::new(name)?,
        };
        let phone = Phone::parse_optional(input.phone)?;

        // Cheap early answer; the unique index still decides races
        if self.repo.exists_by_email(&email).await? {
            return Err(AuthError::DuplicateEmail);
        }

        let password =
            UserPassword::from_raw(&raw_password, self.config.hash_cost, self.config.pepper())?;

        let credential = Credential::new(email, password, role);
        let profile = Profile::stub(credential.subject_id, role, name, phone);

        self.repo.create(&credential, &profile).await?;

        let token = self.tokens.issue(credential.subject_id, role)?;

        tracing::info!(
            subject_id = %credential.subject_id,
            role = %role,
            "Subject registered"
        );

        Ok(SignUpOutput {
            subject_id: credential.subject_id,
            role,
            email: credential.email,
            token,
        })
    }
}
