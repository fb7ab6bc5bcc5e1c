//! Token Service
//!
//! Issues and validates the bearer tokens handed out at registration and
//! sign-in. Tokens are stateless: validity is signature plus expiry, with
//! no server-side session to revoke.

use std::fmt;
use std::time::Duration;

use chrono::Utc;
use platform::jwt::JwtCodec;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::application::config::AuthConfig;
use crate::domain::identity::Identity;
use crate::domain::value_object::{role::Role, subject_id::SubjectId};
use crate::error::{AuthError, AuthResult};

// ============================================================================
// Claim Set
// ============================================================================

/// Signed token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSet {
    /// Subject id; older tokens carry it as `user_id`, sometimes numeric
    #[serde(alias = "user_id", deserialize_with = "subject_claim")]
    pub sub: String,
    pub role: Role,
    /// Issued at, seconds since the Unix epoch
    #[serde(default)]
    pub iat: u64,
    /// Expires at, seconds since the Unix epoch
    pub exp: u64,
}

/// Accept the subject as a JSON string or integer and render integers in
/// exact decimal form. Floats are refused rather than rounded.
fn subject_claim<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct SubjectVisitor;

    impl Visitor<'_> for SubjectVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a subject id as string or integer")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(SubjectVisitor)
}

// ============================================================================
// Token Service
// ============================================================================

#[derive(Debug, Clone)]
pub struct TokenService {
    codec: JwtCodec,
    ttl: Duration,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            codec: JwtCodec::hs256(config.token_secret.as_bytes()),
            ttl: config.token_ttl,
        }
    }

    /// Issue a token valid for the configured lifetime
    pub fn issue(&self, subject_id: SubjectId, role: Role) -> AuthResult<String> {
        self.issue_at(subject_id, role, self.ttl, unix_now())
    }

    /// Issue a token as of `now` (seconds since the Unix epoch)
    pub fn issue_at(
        &self,
        subject_id: SubjectId,
        role: Role,
        ttl: Duration,
        now: u64,
    ) -> AuthResult<String> {
        let claims = ClaimSet {
            sub: subject_id.to_string(),
            role,
            iat: now,
            exp: now.saturating_add(ttl.as_secs()),
        };

        Ok(self.codec.encode(&claims)?)
    }

    /// Validate a token against the current time
    pub fn validate(&self, token: &str) -> AuthResult<Identity> {
        self.validate_at(token, unix_now())
    }

    /// Validate a token as of `now`
    ///
    /// A token is expired from the second its `exp` is reached.
    pub fn validate_at(&self, token: &str, now: u64) -> AuthResult<Identity> {
        let claims: ClaimSet = self.codec.decode(token)?;

        if now >= claims.exp {
            return Err(AuthError::TokenExpired);
        }

        let subject_id = claims
            .sub
            .parse::<SubjectId>()
            .map_err(|_| AuthError::InvalidToken("subject is not a valid id".to_string()))?;

        Ok(Identity::new(subject_id, claims.role))
    }
}

fn unix_now() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or(0)
}
