//! The data synchronization pipeline.
//!
//! Two ingestion paths converge here:
//!
//! - **Pull**: [`engine::SyncService`] drains whole resource collections from
//!   the Admin REST API and reconciles every record into local storage.
//! - **Push**: webhook deliveries hand a single record to the same service,
//!   which routes it through the same per-entity reconciliation function.
//!
//! Sharing [`reconcile::Reconciler`] between both paths is what keeps them
//! convergent: identical payload content yields identical stored rows no
//! matter which path carried it, and duplicate deliveries are absorbed by
//! the `(store_id, remote_id)` upsert key.

pub mod engine;
pub mod reconcile;

pub use engine::{
    EntityOutcome, FullSyncReport, FullSyncResults, SyncOutcome, SyncService, WebhookOutcome,
};
pub use reconcile::{DEFAULT_CURRENCY, Reconciler};

use storepulse_core::StoreId;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::shopify::ShopifyError;

/// Errors produced by the sync pipeline.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The requested store does not exist.
    #[error("store not found: {0}")]
    StoreNotFound(StoreId),

    /// A webhook named a shop domain no store is connected for.
    #[error("no store connected for domain {0}")]
    UnknownShopDomain(String),

    /// The remote platform request failed.
    #[error(transparent)]
    Remote(#[from] ShopifyError),

    /// Local storage failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
