//! Session tokens: HMAC-signed JWTs
//!
//! Session tokens are stateless. Validity is signature + expiry only, so a
//! session token cannot be revoked before it expires; refresh tokens are the
//! revocation point.

use std::fmt;

use jsonwebtoken::{
    decode, decode_header, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// Value of the `iss` claim on every token we mint
pub const ISSUER: &str = "chirpy";

/// JWT claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    /// User ID
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signed session token in its compact `header.claims.signature` form
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Token signature is invalid")]
    SignatureInvalid,
    #[error("Token has expired")]
    TokenExpired,
    #[error("Token subject is not a user id")]
    MalformedSubject,
    #[error("Token is malformed")]
    Malformed,
    #[error("Failed to sign token: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::TokenExpired,
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName => TokenError::SignatureInvalid,
            _ => TokenError::Malformed,
        }
    }
}

/// Header errors are classified separately: a header that is well-formed JSON
/// but names no supported algorithm (`none`, `ES256K`, ...) is an algorithm
/// mismatch, not a malformed token.
fn header_error(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::Json(e) if e.classify() == serde_json::error::Category::Data => {
            TokenError::SignatureInvalid
        }
        _ => err.into(),
    }
}

/// Issues and validates session tokens with a single symmetric secret
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for JwtManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtManager")
            .field("issuer", &ISSUER)
            .finish_non_exhaustive()
    }
}

impl JwtManager {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Accept the whole HMAC family, nothing else
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = 0;
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Mint a token for `subject` valid for `ttl` from now
    pub fn issue(&self, subject: Uuid, ttl: Duration) -> Result<SessionToken, TokenError> {
        self.issue_at(subject, ttl, OffsetDateTime::now_utc())
    }

    /// Mint a token as if the clock read `now`. A negative `ttl` yields a
    /// token that is already expired.
    pub fn issue_at(
        &self,
        subject: Uuid,
        ttl: Duration,
        now: OffsetDateTime,
    ) -> Result<SessionToken, TokenError> {
        let claims = Claims {
            iss: ISSUER.to_string(),
            sub: subject.to_string(),
            iat: now.unix_timestamp(),
            exp: (now + ttl).unix_timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map(SessionToken)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify signature, algorithm, issuer and expiry, returning the claims
    pub fn validate_claims(&self, token: &str) -> Result<Claims, TokenError> {
        decode_header(token).map_err(header_error)?;
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }

    /// Validate a token and return the user it was issued to
    pub fn validate(&self, token: &str) -> Result<Uuid, TokenError> {
        let claims = self.validate_claims(token)?;
        Uuid::parse_str(&claims.sub).map_err(|_| TokenError::MalformedSubject)
    }
}
