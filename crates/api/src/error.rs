//! API error type and the HTTP translation boundary
//!
//! Every error leaving a handler goes through [`ApiError`]. Authentication
//! failures are mapped here, in one place, so that clients never learn which
//! check failed.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chirpy_shared::StoreError;
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;

const UNAUTHORIZED_MESSAGE: &str = "Invalid or missing credentials";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to clients
    fn public_message(&self) -> String {
        match self {
            ApiError::Database(_) | ApiError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(json!({
            "error": self.public_message(),
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound("Resource not found".into()),
            StoreError::Conflict(msg) => ApiError::Conflict(msg),
            StoreError::Database(e) => ApiError::Database(e.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized(AuthError::InvalidCredentials.to_string())
            }
            AuthError::Unauthorized | AuthError::MissingCredential => {
                ApiError::Unauthorized(UNAUTHORIZED_MESSAGE.into())
            }
            // A record the caller referred to is gone; treat like a bad credential
            AuthError::Store(StoreError::NotFound) => {
                ApiError::Unauthorized(UNAUTHORIZED_MESSAGE.into())
            }
            AuthError::Store(e) => e.into(),
            AuthError::HashingFailure(msg)
            | AuthError::EntropySourceFailure(msg)
            | AuthError::TokenSigning(msg) => ApiError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failures_are_indistinguishable() {
        let unauthorized = ApiError::from(AuthError::Unauthorized);
        let missing = ApiError::from(AuthError::MissingCredential);
        let gone = ApiError::from(AuthError::Store(StoreError::NotFound));

        for err in [&unauthorized, &missing, &gone] {
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        }
        assert_eq!(unauthorized.to_string(), missing.to_string());
        assert_eq!(unauthorized.to_string(), gone.to_string());
    }

    #[test]
    fn test_invalid_credentials_message() {
        let err = ApiError::from(AuthError::InvalidCredentials);
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "Incorrect email or password");
    }

    #[test]
    fn test_crypto_failures_are_internal() {
        let err = ApiError::from(AuthError::EntropySourceFailure("os rng".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Internal server error");

        let err = ApiError::from(AuthError::HashingFailure("argon2".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_store_errors() {
        assert_eq!(
            ApiError::from(StoreError::NotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(StoreError::Conflict("dup".into())).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(AuthError::Store(StoreError::Conflict("dup".into()))).status_code(),
            StatusCode::CONFLICT
        );
    }
}
