//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                           - Liveness check
//! GET  /health/ready                     - Readiness check (verifies database)
//!
//! # Stores
//! POST /stores/connect                   - Connect (upsert) a store by shop domain
//! GET  /stores/{tenant_id}               - List a tenant's stores
//!
//! # Sync (pull path)
//! POST /sync/products                    - Sync a store's products
//! POST /sync/customers                   - Sync a store's customers
//! POST /sync/orders                      - Sync a store's orders
//! POST /sync/full                        - Sync all entity types
//! GET  /sync/logs/{store_id}             - Recent sync ledger entries
//!
//! # Webhooks (push path)
//! POST /webhooks/shopify                 - Single-event ingestion
//!
//! # Metrics (read-only aggregates over local storage)
//! GET  /metrics/{store_id}/summary        - Counts + revenue, optional date window
//! GET  /metrics/{store_id}/revenue-by-day - Last 7 days of revenue
//! GET  /metrics/{store_id}/top-customers  - Top customers by spend
//! ```

pub mod metrics;
pub mod stores;
pub mod sync;
pub mod webhooks;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the application router (health endpoints are added in `main`).
pub fn routes() -> Router<AppState> {
    Router::new()
        // Stores
        .route("/stores/connect", post(stores::connect))
        .route("/stores/{tenant_id}", get(stores::list_for_tenant))
        // Sync
        .route("/sync/products", post(sync::products))
        .route("/sync/customers", post(sync::customers))
        .route("/sync/orders", post(sync::orders))
        .route("/sync/full", post(sync::full))
        .route("/sync/logs/{store_id}", get(sync::logs))
        // Webhooks
        .route("/webhooks/shopify", post(webhooks::shopify))
        // Metrics
        .route("/metrics/{store_id}/summary", get(metrics::summary))
        .route("/metrics/{store_id}/revenue-by-day", get(metrics::revenue_by_day))
        .route("/metrics/{store_id}/top-customers", get(metrics::top_customers))
}
