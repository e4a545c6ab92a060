//! Store repository: one external-platform connection per tenant.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use storepulse_core::{AccessToken, StoreId, TenantId};

use super::RepositoryError;

/// A tenant's connected Shopify store.
///
/// The access token is never serialized into API responses.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Store {
    pub id: StoreId,
    pub tenant_id: TenantId,
    /// Shop domain (e.g., acme.myshopify.com). Unique across all tenants.
    pub shop_domain: String,
    #[serde(skip_serializing)]
    pub access_token: AccessToken,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Repository for store records.
pub struct StoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a store by its local id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: StoreId) -> Result<Option<Store>, RepositoryError> {
        let store = sqlx::query_as::<_, Store>(
            r"
            SELECT id, tenant_id, shop_domain, access_token, created_at, updated_at
            FROM stores
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(store)
    }

    /// Get a store by its shop domain.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_domain(&self, shop_domain: &str) -> Result<Option<Store>, RepositoryError> {
        let store = sqlx::query_as::<_, Store>(
            r"
            SELECT id, tenant_id, shop_domain, access_token, created_at, updated_at
            FROM stores
            WHERE shop_domain = $1
            ",
        )
        .bind(shop_domain)
        .fetch_optional(self.pool)
        .await?;

        Ok(store)
    }

    /// Connect (or re-connect) a store.
    ///
    /// Upsert keyed on the shop domain: reconnecting an already-known domain
    /// updates its credential and tenant instead of creating a second store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn connect(
        &self,
        tenant_id: TenantId,
        shop_domain: &str,
        access_token: &AccessToken,
    ) -> Result<Store, RepositoryError> {
        let store = sqlx::query_as::<_, Store>(
            r"
            INSERT INTO stores (tenant_id, shop_domain, access_token)
            VALUES ($1, $2, $3)
            ON CONFLICT (shop_domain) DO UPDATE SET
                tenant_id = EXCLUDED.tenant_id,
                access_token = EXCLUDED.access_token,
                updated_at = now()
            RETURNING id, tenant_id, shop_domain, access_token, created_at, updated_at
            ",
        )
        .bind(tenant_id)
        .bind(shop_domain)
        .bind(access_token)
        .fetch_one(self.pool)
        .await?;

        Ok(store)
    }

    /// List all stores connected by a tenant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_tenant(&self, tenant_id: TenantId) -> Result<Vec<Store>, RepositoryError> {
        let stores = sqlx::query_as::<_, Store>(
            r"
            SELECT id, tenant_id, shop_domain, access_token, created_at, updated_at
            FROM stores
            WHERE tenant_id = $1
            ORDER BY created_at ASC
            ",
        )
        .bind(tenant_id)
        .fetch_all(self.pool)
        .await?;

        Ok(stores)
    }
}
