//! Errors produced by the authentication core
//!
//! Finer-grained causes (bad signature, expired session token, unknown or
//! revoked refresh token) are logged where they happen and collapse into
//! `Unauthorized` before leaving [`super::SessionService`].

use chirpy_shared::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password; the two are deliberately indistinguishable
    #[error("Incorrect email or password")]
    InvalidCredentials,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Missing authentication")]
    MissingCredential,
    #[error("Password hashing failed: {0}")]
    HashingFailure(String),
    #[error("Entropy source failure: {0}")]
    EntropySourceFailure(String),
    #[error("Failed to sign session token: {0}")]
    TokenSigning(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}
