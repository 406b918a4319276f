//! Authentication module for Chirpy

pub mod credentials;
mod error;
pub mod jwt;
pub mod middleware;
#[cfg(test)]
mod middleware_tests;
pub mod password;
pub mod refresh;
pub mod service;

pub use credentials::{
    authorization_header, extract_api_key, extract_bearer, verify_api_key, API_KEY_PREFIX,
    BEARER_PREFIX,
};
pub use error::AuthError;
pub use jwt::{Claims, JwtManager, SessionToken, TokenError, ISSUER};
pub use middleware::{require_auth, AuthUser};
pub use password::{generate_decoy_hash, hash_password, verify_password};
pub use refresh::{RefreshToken, RefreshTokenStore, REFRESH_TOKEN_BYTES};
pub use service::{LoginOutcome, SessionService, REFRESH_TOKEN_TTL, SESSION_TOKEN_TTL};
