//! Persistence collaborator used by the API
//!
//! Every operation is a single round trip; callers own any multi-step logic
//! (expiry checks, auto-revocation) so that both implementations stay dumb.

mod memory;
mod postgres;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::StoreResult;
use crate::models::{Chirp, RefreshTokenRecord, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a user. Fails with `Conflict` if the email is taken.
    async fn create_user(&self, email: &str, hashed_password: &str) -> StoreResult<User>;

    async fn get_user(&self, id: Uuid) -> StoreResult<User>;

    async fn get_user_by_email(&self, email: &str) -> StoreResult<User>;

    /// Replace email and password hash wholesale
    async fn update_user(&self, id: Uuid, email: &str, hashed_password: &str)
        -> StoreResult<User>;

    async fn set_chirpy_red(&self, id: Uuid, is_chirpy_red: bool) -> StoreResult<()>;

    /// Remove every user (and, by cascade, their chirps and refresh tokens)
    async fn delete_all_users(&self) -> StoreResult<u64>;

    /// Fails with `NotFound` if `user_id` does not exist
    async fn create_refresh_token(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: OffsetDateTime,
    ) -> StoreResult<RefreshTokenRecord>;

    async fn get_refresh_token(&self, token: &str) -> StoreResult<RefreshTokenRecord>;

    /// Set `revoked_at` if it is not set yet. Repeat calls keep the first
    /// revocation time and still succeed.
    async fn revoke_refresh_token(&self, token: &str) -> StoreResult<()>;

    async fn create_chirp(&self, body: &str, user_id: Uuid) -> StoreResult<Chirp>;

    /// All chirps, oldest first
    async fn list_chirps(&self) -> StoreResult<Vec<Chirp>>;

    async fn get_chirp(&self, id: Uuid) -> StoreResult<Chirp>;

    async fn delete_chirp(&self, id: Uuid) -> StoreResult<()>;
}
