//! `Authorization: Bearer <token>` parsing

use http::HeaderMap;
use http::header::AUTHORIZATION;
use thiserror::Error;

pub const BEARER_SCHEME: &str = "Bearer";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BearerError {
    #[error("Authorization header is missing")]
    Missing,

    #[error("Authorization header is not `Bearer <token>`")]
    Malformed,
}

/// Extract the token from the `Authorization` header
///
/// The value must be exactly the `Bearer` scheme, one space, and a non-empty
/// token with no further spaces. The scheme match is case-sensitive.
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, BearerError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(BearerError::Missing)?
        .to_str()
        .map_err(|_| BearerError::Malformed)?;

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(BEARER_SCHEME), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(BearerError::Malformed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_extracts_token() {
        let headers = headers("Bearer abc.def.ghi");
        assert_eq!(extract_bearer(&headers), Ok("abc.def.ghi"));
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(extract_bearer(&HeaderMap::new()), Err(BearerError::Missing));
    }

    #[test]
    fn test_rejects_other_shapes() {
        for value in [
            "abc.def.ghi",
            "Bearer",
            "Bearer ",
            "bearer abc",
            "Basic abc",
            "Bearer  abc",
            "Bearer abc def",
            "Token abc",
        ] {
            assert_eq!(
                extract_bearer(&headers(value)),
                Err(BearerError::Malformed),
                "{value:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_non_visible_ascii() {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xfftoken").unwrap(),
        );
        assert_eq!(extract_bearer(&headers), Err(BearerError::Malformed));
    }
}
