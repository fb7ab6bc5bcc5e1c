//! Phone Value Object
//!
//! Free-form contact number. Accepts digits, spaces and the usual
//! separators; no country-specific validation.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

const PHONE_MAX_LENGTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone(String);

impl Phone {
    /// Blank input means "no phone" and yields `Ok(None)`.
    pub fn parse_optional(raw: Option<String>) -> AppResult<Option<Self>> {
        let Some(raw) = raw else {
            return Ok(None);
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let valid = trimmed.len() <= PHONE_MAX_LENGTH
            && trimmed.chars().any(|c| c.is_ascii_digit())
            && trimmed
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'));

        if !valid {
            return Err(AppError::bad_request("Invalid phone number")
                .with_action("Use digits, spaces, +, - and parentheses only"));
        }

        Ok(Some(Self(trimmed.to_string())))
    }

    pub fn from_db(phone: impl Into<String>) -> Self {
        Self(phone.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_optional() {
        assert_eq!(Phone::parse_optional(None).unwrap(), None);
        assert_eq!(Phone::parse_optional(Some("  ".into())).unwrap(), None);
        assert_eq!(
            Phone::parse_optional(Some("+7 (900) 123-45-67".into()))
                .unwrap()
                .unwrap()
                .as_str(),
            "+7 (900) 123-45-67"
        );
    }

    #[test]
    fn test_phone_rejects_letters() {
        assert!(Phone::parse_optional(Some("call me".into())).is_err());
        assert!(Phone::parse_optional(Some("+-()".into())).is_err());
    }
}
