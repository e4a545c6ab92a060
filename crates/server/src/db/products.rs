//! Product repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use storepulse_core::{ProductId, StoreId};

use super::RepositoryError;

/// A locally synced product.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub store_id: StoreId,
    /// Platform-assigned id; the reconciliation key within the store.
    pub remote_id: String,
    pub title: String,
    pub price: Decimal,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Repository for product records.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create-or-update a product keyed on `(store_id, remote_id)`.
    ///
    /// The currency is only set on first insert; updates keep the stored
    /// value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert(
        &self,
        store_id: StoreId,
        remote_id: &str,
        title: &str,
        price: Decimal,
        currency: &str,
    ) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            INSERT INTO products (store_id, remote_id, title, price, currency)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (store_id, remote_id) DO UPDATE SET
                title = EXCLUDED.title,
                price = EXCLUDED.price,
                updated_at = now()
            RETURNING id, store_id, remote_id, title, price, currency, created_at, updated_at
            ",
        )
        .bind(store_id)
        .bind(remote_id)
        .bind(title)
        .bind(price)
        .bind(currency)
        .fetch_one(self.pool)
        .await?;

        Ok(product)
    }

    /// Count a store's products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self, store_id: StoreId) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM products WHERE store_id = $1
            ",
        )
        .bind(store_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }
}
