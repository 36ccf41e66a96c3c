//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::services::{JwtKeys, UploadStore};

/// Application state shared across all handlers.
///
/// Cheap to clone; everything lives behind one `Arc` and is read-only.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    keys: JwtKeys,
    uploads: UploadStore,
}

impl AppState {
    /// Build state from configuration and a connection pool.
    #[must_use]
    pub fn new(config: ApiConfig, pool: PgPool) -> Self {
        let keys = JwtKeys::from_config(&config.tokens);
        let uploads = UploadStore::new(config.uploads_dir.clone());
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                keys,
                uploads,
            }),
        }
    }

    /// Application configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Token signing keys.
    #[must_use]
    pub fn keys(&self) -> &JwtKeys {
        &self.inner.keys
    }

    /// Upload storage.
    #[must_use]
    pub fn uploads(&self) -> &UploadStore {
        &self.inner.uploads
    }
}
