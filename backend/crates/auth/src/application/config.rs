//! Application Configuration
//!
//! Configuration for the Auth application layer. Built once at startup and
//! shared by `Arc`; nothing here changes afterwards.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use platform::password::HashCost;
use thiserror::Error;

/// Insecure HMAC secret used only when no secret is configured outside
/// production. Never deploy with this value.
pub const DEV_TOKEN_SECRET: &str = "refurnish-insecure-dev-secret";

/// Minimum secret length accepted in production (HS256 key size)
pub const MIN_PRODUCTION_SECRET_BYTES: usize = 32;

/// Default token lifetime
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(72 * 3600);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set in production")]
    MissingSecret,

    #[error("JWT_SECRET must be at least {min} bytes in production (got {actual})")]
    WeakSecret { min: usize, actual: usize },

    #[error("Unknown environment `{0}` (expected development or production)")]
    UnknownEnvironment(String),
}

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl Default for Environment {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Environment::Development
        } else {
            Environment::Production
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(ConfigError::UnknownEnvironment(other.to_string())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Environment::Development => "development",
            Environment::Production => "production",
        })
    }
}

/// HMAC secret for signing tokens
#[derive(Clone)]
pub struct TokenSecret(Vec<u8>);

impl TokenSecret {
    /// Resolve the configured secret for an environment
    ///
    /// Production fails fast on a missing or short secret. Elsewhere a
    /// missing secret falls back to [`DEV_TOKEN_SECRET`].
    pub fn resolve(raw: Option<&str>, environment: Environment) -> Result<Self, ConfigError> {
        let raw = raw.map(str::trim).filter(|s| !s.is_empty());

        match (raw, environment) {
            (None, Environment::Production) => Err(ConfigError::MissingSecret),
            (None, Environment::Development) => {
                tracing::warn!("JWT_SECRET is not set; using the insecure development secret");
                Ok(Self::development())
            }
            (Some(secret), Environment::Production)
                if secret.len() < MIN_PRODUCTION_SECRET_BYTES =>
            {
                Err(ConfigError::WeakSecret {
                    min: MIN_PRODUCTION_SECRET_BYTES,
                    actual: secret.len(),
                })
            }
            (Some(secret), _) => Ok(Self(secret.as_bytes().to_vec())),
        }
    }

    pub fn development() -> Self {
        Self(DEV_TOKEN_SECRET.as_bytes().to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TokenSecret").field(&"[REDACTED]").finish()
    }
}

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub token_secret: TokenSecret,
    /// Lifetime of issued tokens
    pub token_ttl: Duration,
    /// Argon2id cost for new password hashes
    pub hash_cost: HashCost,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: TokenSecret::development(),
            token_ttl: DEFAULT_TOKEN_TTL,
            hash_cost: HashCost::default(),
            password_pepper: None,
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &self.token_secret)
            .field("token_ttl", &self.token_ttl)
            .field("hash_cost", &self.hash_cost)
            .field(
                "password_pepper",
                &self.password_pepper.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl AuthConfig {
    pub fn new(token_secret: TokenSecret) -> Self {
        Self {
            token_secret,
            ..Default::default()
        }
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}
