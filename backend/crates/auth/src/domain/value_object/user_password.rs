//! User Password Value Object
//!
//! Domain wrapper over `platform::password`: maps policy and hashing
//! failures to user-facing `AppError`s.
//!
//! ## Usage
//! ```rust
//! use auth::domain::value_object::user_password::{RawPassword, UserPassword};
//! use platform::password::HashCost;
//!
//! let raw = RawPassword::new("pw123456".to_string()).unwrap();
//! let hashed = UserPassword::from_raw(&raw, HashCost::MINIMAL, None).unwrap();
//! assert!(hashed.verify(&raw, None));
//! ```

use kernel::error::app_error::{AppError, AppResult};
use platform::password::{
    ClearTextPassword, HashCost, HashedPassword, PasswordPolicyError,
};
use std::fmt;

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input, zeroized on drop
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Create a password for a new account, enforcing the policy
    pub fn new(raw: String) -> AppResult<Self> {
        let clear_text = ClearTextPassword::new(raw).map_err(policy_error)?;
        Ok(Self(clear_text))
    }

    /// Wrap a password presented at sign-in (non-empty check only)
    pub fn for_verification(raw: String) -> AppResult<Self> {
        let clear_text = ClearTextPassword::for_verification(raw).map_err(policy_error)?;
        Ok(Self(clear_text))
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

fn policy_error(err: PasswordPolicyError) -> AppError {
    match err {
        PasswordPolicyError::TooShort { min, .. } => {
            AppError::bad_request(format!("Password must be at least {} characters", min))
                .with_action("Choose a longer password")
        }
        PasswordPolicyError::TooLong { max, .. } => {
            AppError::bad_request(format!("Password must be at most {} characters", max))
                .with_action("Choose a shorter password")
        }
        PasswordPolicyError::EmptyOrWhitespace => {
            AppError::bad_request("Password is required").with_action("Enter a password")
        }
        PasswordPolicyError::InvalidCharacter => {
            AppError::bad_request("Password contains invalid characters")
                .with_action("Remove control characters from the password")
        }
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// Argon2id PHC string, safe to store
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    pub fn from_raw(raw: &RawPassword, cost: HashCost, pepper: Option<&[u8]>) -> AppResult<Self> {
        let hashed = raw
            .inner()
            .hash(cost, pepper)
            .map_err(|e| AppError::internal("Password hashing failed").with_source(e))?;

        Ok(Self(hashed))
    }

    /// Create from PHC string (from database)
    pub fn from_phc_string(phc_string: impl Into<String>) -> AppResult<Self> {
        let hashed = HashedPassword::from_phc_string(phc_string)
            .map_err(|e| AppError::internal("Invalid password hash in database").with_source(e))?;

        Ok(Self(hashed))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// Constant-time check; `pepper` must match the one used when hashing
    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(raw.inner(), pepper)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_password_validation() {
        assert!(RawPassword::new("pw123456".to_string()).is_ok());

        let err = RawPassword::new("pw1".to_string()).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.message(), "Password must be at least 6 characters");

        let err = RawPassword::new(String::new()).unwrap_err();
        assert_eq!(err.message(), "Password is required");
    }

    #[test]
    fn test_verification_password_skips_length_policy() {
        let raw = RawPassword::for_verification("pw1".to_string()).unwrap();
        let hashed = UserPassword::from_raw(
            &RawPassword::new("pw123456".to_string()).unwrap(),
            HashCost::MINIMAL,
            None,
        )
        .unwrap();
        assert!(!hashed.verify(&raw, None));
        assert!(RawPassword::for_verification(String::new()).is_err());
    }

    #[test]
    fn test_hash_and_verify() {
        let raw = RawPassword::new("pw123456".to_string()).unwrap();
        let hashed = UserPassword::from_raw(&raw, HashCost::MINIMAL, Some(b"pepper")).unwrap();

        assert!(hashed.verify(&raw, Some(b"pepper")));
        assert!(!hashed.verify(&raw, None));

        let restored = UserPassword::from_phc_string(hashed.as_phc_string()).unwrap();
        assert!(restored.verify(&raw, Some(b"pepper")));
    }

    #[test]
    fn test_bad_stored_hash_is_internal() {
        let err = UserPassword::from_phc_string("plaintext").unwrap_err();
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_debug_redaction() {
        let raw = RawPassword::new("SecretPassword".to_string()).unwrap();
        assert!(!format!("{:?}", raw).contains("Secret"));
    }
}
