//! Application state

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chirpy_shared::Store;

use crate::{
    auth::{AuthError, JwtManager, SessionService},
    config::Config,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<Config>,
    pub sessions: SessionService,
    /// Hits on `/app/*` since startup
    pub fileserver_hits: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Result<Self, AuthError> {
        let jwt_manager = JwtManager::new(&config.jwt_secret);
        let sessions = SessionService::new(store.clone(), jwt_manager)?;
        tracing::info!(platform = %config.platform, "Session service initialized");

        Ok(Self {
            store,
            config: Arc::new(config),
            sessions,
            fileserver_hits: Arc::new(AtomicU64::new(0)),
        })
    }

    pub fn record_hit(&self) {
        self.fileserver_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> u64 {
        self.fileserver_hits.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
impl AppState {
    /// State backed by an empty in-memory store
    pub(crate) fn for_tests(platform: &str) -> Self {
        let store: Arc<dyn Store> = Arc::new(chirpy_shared::MemoryStore::new());
        Self::new(store, Config::for_tests(platform)).unwrap()
    }
}
