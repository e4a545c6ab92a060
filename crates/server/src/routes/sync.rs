//! Sync trigger and ledger route handlers.
//!
//! Each trigger runs the whole sync to completion within this request and
//! answers with the outcome; there is no background job to poll.

use axum::{Json, extract::Path, extract::State};
use serde::Deserialize;
use storepulse_core::StoreId;
use tracing::instrument;

use crate::db::{SyncLogEntry, SyncLogRepository};
use crate::error::AppError;
use crate::state::AppState;
use crate::sync::{FullSyncReport, SyncOutcome};

/// Body of a sync trigger request.
#[derive(Debug, Deserialize)]
pub struct SyncRequest {
    pub store_id: StoreId,
}

/// Trigger a product sync.
#[instrument(skip_all)]
pub async fn products(
    State(state): State<AppState>,
    Json(request): Json<SyncRequest>,
) -> Result<Json<SyncOutcome>, AppError> {
    let outcome = state.sync().sync_products(request.store_id).await?;
    Ok(Json(outcome))
}

/// Trigger a customer sync.
#[instrument(skip_all)]
pub async fn customers(
    State(state): State<AppState>,
    Json(request): Json<SyncRequest>,
) -> Result<Json<SyncOutcome>, AppError> {
    let outcome = state.sync().sync_customers(request.store_id).await?;
    Ok(Json(outcome))
}

/// Trigger an order sync.
#[instrument(skip_all)]
pub async fn orders(
    State(state): State<AppState>,
    Json(request): Json<SyncRequest>,
) -> Result<Json<SyncOutcome>, AppError> {
    let outcome = state.sync().sync_orders(request.store_id).await?;
    Ok(Json(outcome))
}

/// Trigger a full sync across all entity types.
///
/// Per-entity failures are reported in the body, not as an error status.
#[instrument(skip_all)]
pub async fn full(
    State(state): State<AppState>,
    Json(request): Json<SyncRequest>,
) -> Result<Json<FullSyncReport>, AppError> {
    let report = state.sync().sync_all(request.store_id).await?;
    Ok(Json(report))
}

/// The most recent ledger entries for a store, newest first.
pub async fn logs(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
) -> Result<Json<Vec<SyncLogEntry>>, AppError> {
    let entries = SyncLogRepository::new(state.pool())
        .list_recent(store_id)
        .await?;
    Ok(Json(entries))
}
