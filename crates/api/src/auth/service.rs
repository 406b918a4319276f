//! Credential & session service
//!
//! Login, session renewal, refresh-token revocation and request
//! authentication. Per refresh token the lifecycle is
//! `Active -> {Expired (auto-revoked), Revoked}` and both ends are terminal.

use std::sync::Arc;

use chirpy_shared::{PublicUser, Store, StoreError};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use super::{
    credentials::extract_bearer,
    jwt::{JwtManager, SessionToken, TokenError},
    password,
    refresh::{RefreshToken, RefreshTokenStore},
    AuthError,
};

pub const SESSION_TOKEN_TTL: Duration = Duration::hours(1);
pub const REFRESH_TOKEN_TTL: Duration = Duration::days(60);

/// Result of a successful login
#[derive(Debug)]
pub struct LoginOutcome {
    pub user: PublicUser,
    pub session_token: SessionToken,
    pub refresh_token: RefreshToken,
}

#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn Store>,
    jwt: JwtManager,
    refresh_tokens: RefreshTokenStore,
    decoy_hash: Arc<str>,
}

async fn hash_blocking(plaintext: String) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || password::hash_password(&plaintext))
        .await
        .map_err(|e| AuthError::HashingFailure(format!("hashing task failed: {e}")))?
}

async fn verify_blocking(plaintext: String, hash: String) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || password::verify_password(&plaintext, &hash))
        .await
        .map_err(|e| AuthError::HashingFailure(format!("verification task failed: {e}")))?
}

impl SessionService {
    pub fn new(store: Arc<dyn Store>, jwt: JwtManager) -> Result<Self, AuthError> {
        let decoy_hash = password::generate_decoy_hash()?;
        Ok(Self {
            refresh_tokens: RefreshTokenStore::new(store.clone()),
            store,
            jwt,
            decoy_hash: Arc::from(decoy_hash),
        })
    }

    pub fn jwt(&self) -> &JwtManager {
        &self.jwt
    }

    pub fn refresh_tokens(&self) -> &RefreshTokenStore {
        &self.refresh_tokens
    }

    /// Create a user with a freshly hashed password
    pub async fn register(&self, email: &str, plaintext: &str) -> Result<PublicUser, AuthError> {
        let hashed = hash_blocking(plaintext.to_string()).await?;
        let user = self.store.create_user(email, &hashed).await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user.into())
    }

    /// Replace a user's email and password hash
    pub async fn update_credentials(
        &self,
        user_id: Uuid,
        email: &str,
        plaintext: &str,
    ) -> Result<PublicUser, AuthError> {
        let hashed = hash_blocking(plaintext.to_string()).await?;
        let user = self.store.update_user(user_id, email, &hashed).await?;

        tracing::info!(user_id = %user.id, "User credentials updated");
        Ok(user.into())
    }

    /// Verify an email/password pair and issue a session + refresh token
    pub async fn login(&self, email: &str, plaintext: &str) -> Result<LoginOutcome, AuthError> {
        let user = match self.store.get_user_by_email(email).await {
            Ok(user) => user,
            Err(StoreError::NotFound) => {
                // Same cost as a real check so response time does not reveal the miss
                let _ = verify_blocking(plaintext.to_string(), self.decoy_hash.to_string()).await;
                tracing::info!("Login rejected: unknown email");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        };

        match verify_blocking(plaintext.to_string(), user.hashed_password.clone()).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!(user_id = %user.id, "Login rejected: wrong password");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => {
                tracing::error!(user_id = %user.id, error = %e, "Stored password hash is unusable");
                return Err(AuthError::InvalidCredentials);
            }
        }

        let session_token = self.issue_session_token(user.id)?;
        let refresh_token = RefreshToken::generate()?;
        self.refresh_tokens
            .persist(&refresh_token, user.id, REFRESH_TOKEN_TTL)
            .await?;

        tracing::info!(user_id = %user.id, refresh_token = ?refresh_token, "Login successful");

        Ok(LoginOutcome {
            user: user.into(),
            session_token,
            refresh_token,
        })
    }

    /// Exchange a usable refresh token for a new session token
    ///
    /// The refresh token is neither rotated nor extended. An expired token is
    /// marked revoked before the request is rejected.
    pub async fn refresh(&self, refresh_token: &str) -> Result<SessionToken, AuthError> {
        let record = match self.refresh_tokens.lookup(refresh_token).await {
            Ok(record) => record,
            Err(StoreError::NotFound) => {
                tracing::warn!("Refresh rejected: unknown refresh token");
                return Err(AuthError::Unauthorized);
            }
            Err(e) => return Err(e.into()),
        };

        if record.is_revoked() {
            tracing::warn!(user_id = %record.user_id, "Refresh rejected: token revoked");
            return Err(AuthError::Unauthorized);
        }

        if record.is_expired_at(OffsetDateTime::now_utc()) {
            self.refresh_tokens.revoke(refresh_token).await?;
            tracing::warn!(
                user_id = %record.user_id,
                expired_at = %record.expires_at,
                "Refresh rejected: token expired, auto-revoked"
            );
            return Err(AuthError::Unauthorized);
        }

        let session_token = self.issue_session_token(record.user_id)?;
        tracing::debug!(user_id = %record.user_id, "Session token refreshed");
        Ok(session_token)
    }

    /// Revoke a refresh token. Revoking an already revoked token succeeds.
    pub async fn revoke(&self, refresh_token: &str) -> Result<(), AuthError> {
        match self.refresh_tokens.revoke(refresh_token).await {
            Ok(()) => {
                tracing::info!("Refresh token revoked");
                Ok(())
            }
            Err(StoreError::NotFound) => {
                tracing::warn!("Revoke rejected: unknown refresh token");
                Err(AuthError::Unauthorized)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Resolve an `Authorization` header value to the user it authenticates
    ///
    /// Every failure is `Unauthorized`; the cause only goes to the log.
    pub fn authenticate_request(&self, header: Option<&str>) -> Result<Uuid, AuthError> {
        let token = extract_bearer(header).map_err(|e| {
            tracing::debug!(error = %e, "No bearer credential");
            AuthError::Unauthorized
        })?;

        self.jwt.validate(token).map_err(|e| {
            match e {
                TokenError::TokenExpired => tracing::debug!("Session token expired"),
                other => tracing::warn!(error = %other, "Session token rejected"),
            }
            AuthError::Unauthorized
        })
    }

    fn issue_session_token(&self, user_id: Uuid) -> Result<SessionToken, AuthError> {
        self.jwt
            .issue(user_id, SESSION_TOKEN_TTL)
            .map_err(|e| AuthError::TokenSigning(e.to_string()))
    }
}
