//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::shopify::ShopifyClient;
use crate::sync::SyncService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    pool: PgPool,
    sync: SyncService,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The Shopify client and sync service are constructed here once and
    /// shared for the life of the process; nothing in the pipeline reaches
    /// for global clients.
    #[must_use]
    pub fn new(config: AppConfig, pool: PgPool) -> Self {
        let shopify = ShopifyClient::new(&config.shopify);
        let sync = SyncService::new(pool.clone(), shopify);

        Self {
            inner: Arc::new(AppStateInner { config, pool, sync }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the sync service.
    #[must_use]
    pub fn sync(&self) -> &SyncService {
        &self.inner.sync
    }
}
