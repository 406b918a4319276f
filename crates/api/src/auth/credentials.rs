//! `Authorization` header parsing
//!
//! Extraction does no validation beyond "present and non-empty". A header
//! without the expected prefix is passed through unchanged and left for the
//! token check to reject.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use subtle::ConstantTimeEq;

use super::AuthError;

pub const BEARER_PREFIX: &str = "Bearer ";
pub const API_KEY_PREFIX: &str = "ApiKey ";

/// Raw `Authorization` header value, if present and valid UTF-8
pub fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok())
}

fn extract_with_prefix<'a>(header: Option<&'a str>, prefix: &str) -> Result<&'a str, AuthError> {
    let header = header.ok_or(AuthError::MissingCredential)?;
    if header.trim().is_empty() {
        return Err(AuthError::MissingCredential);
    }
    Ok(header.strip_prefix(prefix).unwrap_or(header))
}

/// Bearer credential (session token or refresh token) from a header value
pub fn extract_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    extract_with_prefix(header, BEARER_PREFIX)
}

/// Static API key from a header value (Polka webhook)
pub fn extract_api_key(header: Option<&str>) -> Result<&str, AuthError> {
    extract_with_prefix(header, API_KEY_PREFIX)
}

/// Check an `ApiKey <key>` header against the configured key in constant time
pub fn verify_api_key(header: Option<&str>, expected: &str) -> Result<(), AuthError> {
    let provided = extract_api_key(header)?;
    if bool::from(provided.as_bytes().ct_eq(expected.as_bytes())) {
        Ok(())
    } else {
        Err(AuthError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_bearer_valid() {
        assert_eq!(extract_bearer(Some("Bearer xyz")).unwrap(), "xyz");
    }

    #[test]
    fn test_extract_bearer_missing() {
        assert!(matches!(
            extract_bearer(None),
            Err(AuthError::MissingCredential)
        ));
        assert!(matches!(
            extract_bearer(Some("")),
            Err(AuthError::MissingCredential)
        ));
        assert!(matches!(
            extract_bearer(Some("   ")),
            Err(AuthError::MissingCredential)
        ));
    }

    #[test]
    fn test_extract_bearer_passes_unprefixed_value_through() {
        assert_eq!(extract_bearer(Some("xyz")).unwrap(), "xyz");
        assert_eq!(extract_bearer(Some("Basic abc")).unwrap(), "Basic abc");
    }

    #[test]
    fn test_extract_bearer_keeps_remainder_verbatim() {
        assert_eq!(extract_bearer(Some("Bearer  a b ")).unwrap(), " a b ");
        // Prefix match is case-sensitive
        assert_eq!(extract_bearer(Some("bearer xyz")).unwrap(), "bearer xyz");
    }

    #[test]
    fn test_extract_api_key() {
        assert_eq!(extract_api_key(Some("ApiKey f271c8")).unwrap(), "f271c8");
        assert!(matches!(
            extract_api_key(None),
            Err(AuthError::MissingCredential)
        ));
    }

    #[test]
    fn test_verify_api_key() {
        assert!(verify_api_key(Some("ApiKey secret-key"), "secret-key").is_ok());
        assert!(matches!(
            verify_api_key(Some("ApiKey wrong-key"), "secret-key"),
            Err(AuthError::Unauthorized)
        ));
        assert!(matches!(
            verify_api_key(Some("ApiKey secret"), "secret-key"),
            Err(AuthError::Unauthorized)
        ));
        assert!(matches!(
            verify_api_key(None, "secret-key"),
            Err(AuthError::MissingCredential)
        ));
    }

    #[test]
    fn test_authorization_header_lookup() {
        let mut headers = HeaderMap::new();
        assert_eq!(authorization_header(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(authorization_header(&headers), Some("Bearer abc"));
    }
}
