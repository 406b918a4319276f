//! Record types stored by the persistence layer

use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Full user row, including the password hash
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub email: String,
    pub hashed_password: String,
    pub is_chirpy_red: bool,
}

/// User fields that may leave the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub email: String,
    pub is_chirpy_red: bool,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            created_at: user.created_at,
            updated_at: user.updated_at,
            email: user.email,
            is_chirpy_red: user.is_chirpy_red,
        }
    }
}

/// Server-side state of an opaque refresh token
#[derive(Debug, Clone, FromRow)]
pub struct RefreshTokenRecord {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
    pub revoked_at: Option<OffsetDateTime>,
}

impl RefreshTokenRecord {
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// A token stops being usable at the instant `expires_at` is reached
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        now >= self.expires_at
    }

    pub fn is_usable_at(&self, now: OffsetDateTime) -> bool {
        !self.is_revoked() && !self.is_expired_at(now)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Chirp {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub body: String,
    pub user_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn record(expires_at: OffsetDateTime, revoked_at: Option<OffsetDateTime>) -> RefreshTokenRecord {
        let now = OffsetDateTime::now_utc();
        RefreshTokenRecord {
            token: "ab".repeat(32),
            user_id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            expires_at,
            revoked_at,
        }
    }

    #[test]
    fn test_refresh_token_usable_before_expiry() {
        let now = OffsetDateTime::now_utc();
        let rec = record(now + Duration::days(60), None);
        assert!(rec.is_usable_at(now));
    }

    #[test]
    fn test_refresh_token_unusable_at_exact_expiry() {
        let now = OffsetDateTime::now_utc();
        let rec = record(now, None);
        assert!(rec.is_expired_at(now));
        assert!(!rec.is_usable_at(now));
    }

    #[test]
    fn test_revoked_refresh_token_unusable() {
        let now = OffsetDateTime::now_utc();
        let rec = record(now + Duration::days(1), Some(now));
        assert!(rec.is_revoked());
        assert!(!rec.is_usable_at(now));
    }

    #[test]
    fn test_public_user_drops_password_hash() {
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            email: "a@b.com".to_string(),
            hashed_password: "$argon2id$secret".to_string(),
            is_chirpy_red: false,
        };

        let public = PublicUser::from(user);
        let json = serde_json::to_value(&public).unwrap();
        assert!(json.get("hashed_password").is_none());
        assert!(!json.to_string().contains("argon2"));
        assert_eq!(json["email"], "a@b.com");
        assert_eq!(json["is_chirpy_red"], false);
    }
}
