// Test code patterns:
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Chirpy shared persistence layer
//!
//! Database pool setup, migrations, record types and the [`Store`] trait the
//! API crate talks to. Two stores are provided:
//!
//! - [`PgStore`]: PostgreSQL via sqlx (production)
//! - [`MemoryStore`]: in-process maps (tests and local experiments)

pub mod db;
pub mod error;
pub mod models;
pub mod store;

pub use db::{create_pool, run_migrations};
pub use error::{StoreError, StoreResult};
pub use models::{Chirp, PublicUser, RefreshTokenRecord, User};
pub use store::{MemoryStore, PgStore, Store};
