//! JSON Web Token codec (HS256)
//!
//! Generic over the claim type; the caller owns claim semantics such as
//! expiry against its own clock. The codec pins the algorithm so a token
//! whose header names anything other than HS256 (including `none`) is
//! rejected before its signature is considered.

use std::fmt;

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    #[error("Token encoding failed: {0}")]
    Encoding(String),

    /// Not three base64url segments, bad JSON, or claims of the wrong shape
    #[error("Token is malformed")]
    Malformed,

    #[error("Token signature does not match")]
    BadSignature,

    #[error("Token algorithm is not accepted")]
    AlgorithmMismatch,

    #[error("Token is missing required claim `{0}`")]
    MissingClaim(String),
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            JwtErrorKind::InvalidSignature => JwtError::BadSignature,
            JwtErrorKind::InvalidAlgorithm | JwtErrorKind::MissingAlgorithm => {
                JwtError::AlgorithmMismatch
            }
            JwtErrorKind::MissingRequiredClaim(claim) => JwtError::MissingClaim(claim.clone()),
            _ => JwtError::Malformed,
        }
    }
}

/// Symmetric HS256 signer/verifier
#[derive(Clone)]
pub struct JwtCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    header: Header,
    validation: Validation,
}

impl JwtCodec {
    pub fn hs256(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is the caller's decision (it holds the clock); presence is ours.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            header: Header::new(Algorithm::HS256),
            validation,
        }
    }

    pub fn encode<C: Serialize>(&self, claims: &C) -> Result<String, JwtError> {
        jsonwebtoken::encode(&self.header, claims, &self.encoding)
            .map_err(|e| JwtError::Encoding(e.to_string()))
    }

    pub fn decode<C: DeserializeOwned>(&self, token: &str) -> Result<C, JwtError> {
        let data = jsonwebtoken::decode::<C>(token, &self.decoding, &self.validation)?;
        Ok(data.claims)
    }
}

impl fmt::Debug for JwtCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtCodec")
            .field("algorithm", &self.header.alg)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
