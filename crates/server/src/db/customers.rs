//! Customer repository.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use storepulse_core::{CustomerId, StoreId};

use super::{DateWindow, RepositoryError};

/// A locally synced customer.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Customer {
    pub id: CustomerId,
    pub store_id: StoreId,
    /// Platform-assigned id; the reconciliation key within the store.
    pub remote_id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Repository for customer records.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create-or-update a customer keyed on `(store_id, remote_id)`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert(
        &self,
        store_id: StoreId,
        remote_id: &str,
        email: Option<&str>,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<Customer, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>(
            r"
            INSERT INTO customers (store_id, remote_id, email, first_name, last_name)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (store_id, remote_id) DO UPDATE SET
                email = EXCLUDED.email,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                updated_at = now()
            RETURNING id, store_id, remote_id, email, first_name, last_name, created_at, updated_at
            ",
        )
        .bind(store_id)
        .bind(remote_id)
        .bind(email)
        .bind(first_name)
        .bind(last_name)
        .fetch_one(self.pool)
        .await?;

        Ok(customer)
    }

    /// Look up a customer by its platform-assigned id.
    ///
    /// Used to resolve an order's embedded customer reference; `None` means
    /// the customer has not been synced yet.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_remote_id(
        &self,
        store_id: StoreId,
        remote_id: &str,
    ) -> Result<Option<Customer>, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>(
            r"
            SELECT id, store_id, remote_id, email, first_name, last_name, created_at, updated_at
            FROM customers
            WHERE store_id = $1 AND remote_id = $2
            ",
        )
        .bind(store_id)
        .bind(remote_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(customer)
    }

    /// Count a store's customers first seen inside the window.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_in_window(
        &self,
        store_id: StoreId,
        window: DateWindow,
    ) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM customers
            WHERE store_id = $1
              AND ($2::timestamptz IS NULL OR created_at >= $2)
              AND ($3::timestamptz IS NULL OR created_at <= $3)
            ",
        )
        .bind(store_id)
        .bind(window.start)
        .bind(window.end)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }
}
