//! Store connection route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use storepulse_core::{AccessToken, TenantId};

use crate::db::{Store, StoreRepository};
use crate::error::AppError;
use crate::state::AppState;

/// Body of a store connect request.
#[derive(Debug, Deserialize)]
pub struct ConnectStoreRequest {
    pub tenant_id: TenantId,
    pub shop_domain: String,
    pub access_token: String,
}

/// Connect a store to a tenant.
///
/// Upsert keyed on the shop domain: reconnecting a known domain replaces its
/// credential instead of creating a duplicate store.
pub async fn connect(
    State(state): State<AppState>,
    Json(request): Json<ConnectStoreRequest>,
) -> Result<(StatusCode, Json<Store>), AppError> {
    let shop_domain = request.shop_domain.trim();
    let access_token = AccessToken::new(request.access_token);

    if shop_domain.is_empty() || access_token.is_blank() {
        return Err(AppError::BadRequest(
            "Shop domain and access token are required.".to_string(),
        ));
    }

    let store = StoreRepository::new(state.pool())
        .connect(request.tenant_id, shop_domain, &access_token)
        .await?;

    tracing::info!(shop = %store.shop_domain, tenant = %store.tenant_id, "store connected");
    Ok((StatusCode::CREATED, Json(store)))
}

/// List the stores connected by a tenant.
pub async fn list_for_tenant(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
) -> Result<Json<Vec<Store>>, AppError> {
    let stores = StoreRepository::new(state.pool())
        .list_for_tenant(tenant_id)
        .await?;
    Ok(Json(stores))
}
