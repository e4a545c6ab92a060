//! Database operations for the sync store.
//!
//! # Tables
//!
//! - `stores` - One Shopify connection per tenant (upsert keyed on domain)
//! - `products` / `customers` / `orders` - Synced commerce data, upsert keyed
//!   on `(store_id, remote_id)`
//! - `sync_logs` - Append-only sync ledger
//!
//! All writes are keyed by `(store_id, remote_id)`, so concurrent writers are
//! commutative: the upsert statements are atomic per key and re-running a
//! sync never creates duplicates.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p storepulse-cli -- migrate
//! ```

pub mod customers;
pub mod orders;
pub mod products;
pub mod stores;
pub mod sync_logs;

use std::time::Duration;

use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use customers::{Customer, CustomerRepository};
pub use orders::{Order, OrderRepository, RevenuePoint, TopCustomer};
pub use products::{Product, ProductRepository};
pub use stores::{Store, StoreRepository};
pub use sync_logs::{SyncLogEntry, SyncLogRepository};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Optional time window applied to time-scoped queries.
///
/// `None` bounds are open: an empty window matches everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
