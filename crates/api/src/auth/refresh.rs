//! Refresh tokens: opaque random strings tracked server-side
//!
//! Records are never deleted. Revocation sets `revoked_at`; expiry is checked
//! lazily by the caller when a token is presented.

use std::fmt;
use std::sync::Arc;

use chirpy_shared::{RefreshTokenRecord, Store, StoreResult};
use rand::{rngs::OsRng, TryRngCore};
use serde::Serialize;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use super::AuthError;

/// 32 bytes = 256 bits of entropy, 64 hex characters on the wire
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Opaque refresh token, lowercase hex encoded
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RefreshToken(String);

impl RefreshToken {
    /// Draw a new token from the OS CSPRNG
    pub fn generate() -> Result<Self, AuthError> {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| AuthError::EntropySourceFailure(e.to_string()))?;

        Ok(Self(hex::encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Enough to correlate log lines, not enough to replay
        let prefix = self.0.get(..8).unwrap_or("");
        write!(f, "RefreshToken({prefix}...)")
    }
}

/// Refresh token persistence on top of the shared [`Store`]
#[derive(Clone)]
pub struct RefreshTokenStore {
    store: Arc<dyn Store>,
}

impl RefreshTokenStore {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Store `{token, owner, created_at: now, expires_at: now + ttl}`
    pub async fn persist(
        &self,
        token: &RefreshToken,
        owner: Uuid,
        ttl: Duration,
    ) -> StoreResult<RefreshTokenRecord> {
        let expires_at = OffsetDateTime::now_utc() + ttl;
        self.store
            .create_refresh_token(token.as_str(), owner, expires_at)
            .await
    }

    pub async fn lookup(&self, token: &str) -> StoreResult<RefreshTokenRecord> {
        self.store.get_refresh_token(token).await
    }

    /// Idempotent; fails with `NotFound` only for unknown tokens
    pub async fn revoke(&self, token: &str) -> StoreResult<()> {
        self.store.revoke_refresh_token(token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chirpy_shared::MemoryStore;
    use std::collections::HashSet;

    #[test]
    fn test_generated_token_format() {
        let token = RefreshToken::generate().unwrap();
        assert_eq!(token.as_str().len(), 64);
        assert!(token
            .as_str()
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_generated_tokens_are_unique() {
        let tokens: HashSet<String> = (0..1000)
            .map(|_| RefreshToken::generate().unwrap().into_string())
            .collect();
        assert_eq!(tokens.len(), 1000);
    }

    #[test]
    fn test_debug_output_truncates_token() {
        let token = RefreshToken::generate().unwrap();
        let rendered = format!("{:?}", token);
        assert!(!rendered.contains(token.as_str()));
        assert!(rendered.contains(&token.as_str()[..8]));
    }

    #[tokio::test]
    async fn test_persist_and_lookup() {
        let store = Arc::new(MemoryStore::new());
        let user = store.create_user("a@b.com", "hash").await.unwrap();
        let tokens = RefreshTokenStore::new(store);

        let token = RefreshToken::generate().unwrap();
        let before = OffsetDateTime::now_utc();
        let record = tokens
            .persist(&token, user.id, Duration::days(60))
            .await
            .unwrap();

        assert_eq!(record.token, token.as_str());
        assert_eq!(record.user_id, user.id);
        assert!(record.revoked_at.is_none());
        assert!(record.expires_at >= before + Duration::days(60));
        assert!(record.expires_at <= OffsetDateTime::now_utc() + Duration::days(60));

        let found = tokens.lookup(token.as_str()).await.unwrap();
        assert_eq!(found.user_id, user.id);
    }

    #[tokio::test]
    async fn test_lookup_unknown_token() {
        let tokens = RefreshTokenStore::new(Arc::new(MemoryStore::new()));
        let err = tokens.lookup("0".repeat(64).as_str()).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
