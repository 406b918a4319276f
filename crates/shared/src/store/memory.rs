use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Store;
use crate::error::{StoreError, StoreResult};
use crate::models::{Chirp, RefreshTokenRecord, User};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    refresh_tokens: HashMap<String, RefreshTokenRecord>,
    // Insertion order doubles as created_at order
    chirps: Vec<Chirp>,
}

/// In-process store with the same observable behavior as [`super::PgStore`]
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, email: &str, hashed_password: &str) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == email) {
            return Err(StoreError::Conflict(format!(
                "email {} is already registered",
                email
            )));
        }

        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
            is_chirpy_red: false,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> StoreResult<User> {
        let tables = self.tables.read().await;
        tables.users.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<User> {
        let tables = self.tables.read().await;
        tables
            .users
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == email && u.id != id) {
            return Err(StoreError::Conflict(format!(
                "email {} is already registered",
                email
            )));
        }

        let user = tables.users.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.email = email.to_string();
        user.hashed_password = hashed_password.to_string();
        user.updated_at = OffsetDateTime::now_utc();
        Ok(user.clone())
    }

    async fn set_chirpy_red(&self, id: Uuid, is_chirpy_red: bool) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let user = tables.users.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.is_chirpy_red = is_chirpy_red;
        user.updated_at = OffsetDateTime::now_utc();
        Ok(())
    }

    async fn delete_all_users(&self) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        let deleted = tables.users.len() as u64;
        tables.users.clear();
        tables.refresh_tokens.clear();
        tables.chirps.clear();
        Ok(deleted)
    }

    async fn create_refresh_token(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: OffsetDateTime,
    ) -> StoreResult<RefreshTokenRecord> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(StoreError::NotFound);
        }
        if tables.refresh_tokens.contains_key(token) {
            return Err(StoreError::Conflict("refresh token already exists".into()));
        }

        let now = OffsetDateTime::now_utc();
        let record = RefreshTokenRecord {
            token: token.to_string(),
            user_id,
            created_at: now,
            updated_at: now,
            expires_at,
            revoked_at: None,
        };
        tables
            .refresh_tokens
            .insert(record.token.clone(), record.clone());
        Ok(record)
    }

    async fn get_refresh_token(&self, token: &str) -> StoreResult<RefreshTokenRecord> {
        let tables = self.tables.read().await;
        tables
            .refresh_tokens
            .get(token)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn revoke_refresh_token(&self, token: &str) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let record = tables
            .refresh_tokens
            .get_mut(token)
            .ok_or(StoreError::NotFound)?;

        let now = OffsetDateTime::now_utc();
        record.revoked_at.get_or_insert(now);
        record.updated_at = now;
        Ok(())
    }

    async fn create_chirp(&self, body: &str, user_id: Uuid) -> StoreResult<Chirp> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(StoreError::NotFound);
        }

        let now = OffsetDateTime::now_utc();
        let chirp = Chirp {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            body: body.to_string(),
            user_id,
        };
        tables.chirps.push(chirp.clone());
        Ok(chirp)
    }

    async fn list_chirps(&self) -> StoreResult<Vec<Chirp>> {
        let tables = self.tables.read().await;
        Ok(tables.chirps.clone())
    }

    async fn get_chirp(&self, id: Uuid) -> StoreResult<Chirp> {
        let tables = self.tables.read().await;
        tables
            .chirps
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn delete_chirp(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.chirps.len();
        tables.chirps.retain(|c| c.id != id);
        if tables.chirps.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
