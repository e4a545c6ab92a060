//! Order repository, including the aggregate queries behind the metrics
//! endpoints.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use storepulse_core::{CustomerId, OrderId, StoreId};

use super::{DateWindow, RepositoryError};

/// A locally synced order.
///
/// `customer_id` is null when the remote order referenced a customer that has
/// not been synced locally; the link is not back-filled by a later customer
/// sync.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub store_id: StoreId,
    /// Platform-assigned id; the reconciliation key within the store.
    pub remote_id: String,
    pub total_amount: Decimal,
    pub currency: String,
    pub customer_id: Option<CustomerId>,
    /// First time this order was seen locally; drives time-windowed
    /// analytics and is never changed by later upserts.
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One day of revenue.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct RevenuePoint {
    pub day: NaiveDate,
    pub revenue: Decimal,
}

/// One row of the top-customers ranking.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct TopCustomer {
    pub customer_id: CustomerId,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub total_spent: Decimal,
    pub order_count: i64,
}

/// Repository for order records.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create-or-update an order keyed on `(store_id, remote_id)`.
    ///
    /// `created_at` is set once on first insert so re-syncs do not move
    /// orders between analytics windows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert(
        &self,
        store_id: StoreId,
        remote_id: &str,
        total_amount: Decimal,
        currency: &str,
        customer_id: Option<CustomerId>,
    ) -> Result<Order, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(
            r"
            INSERT INTO orders (store_id, remote_id, total_amount, currency, customer_id)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (store_id, remote_id) DO UPDATE SET
                total_amount = EXCLUDED.total_amount,
                currency = EXCLUDED.currency,
                customer_id = EXCLUDED.customer_id,
                updated_at = now()
            RETURNING id, store_id, remote_id, total_amount, currency, customer_id,
                      created_at, updated_at
            ",
        )
        .bind(store_id)
        .bind(remote_id)
        .bind(total_amount)
        .bind(currency)
        .bind(customer_id)
        .fetch_one(self.pool)
        .await?;

        Ok(order)
    }

    /// Count a store's orders inside the window.
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
            FROM orders
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

    /// Sum order totals inside the window.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn revenue_in_window(
        &self,
        store_id: StoreId,
        window: DateWindow,
    ) -> Result<Decimal, RepositoryError> {
        let revenue = sqlx::query_scalar::<_, Decimal>(
            r"
            SELECT COALESCE(SUM(total_amount), 0)
            FROM orders
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

        Ok(revenue)
    }

    /// Revenue per day since `since`, oldest day first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn revenue_by_day(
        &self,
        store_id: StoreId,
        since: DateTime<Utc>,
    ) -> Result<Vec<RevenuePoint>, RepositoryError> {
        let points = sqlx::query_as::<_, RevenuePoint>(
            r"
            SELECT created_at::date AS day, SUM(total_amount) AS revenue
            FROM orders
            WHERE store_id = $1 AND created_at >= $2
            GROUP BY day
            ORDER BY day ASC
            ",
        )
        .bind(store_id)
        .bind(since)
        .fetch_all(self.pool)
        .await?;

        Ok(points)
    }

    /// Customers ranked by summed order totals inside the window.
    ///
    /// Only orders with a resolved customer link participate.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn top_customers(
        &self,
        store_id: StoreId,
        window: DateWindow,
        limit: i64,
    ) -> Result<Vec<TopCustomer>, RepositoryError> {
        let rows = sqlx::query_as::<_, TopCustomer>(
            r"
            SELECT c.id AS customer_id,
                   c.email,
                   c.first_name,
                   c.last_name,
                   SUM(o.total_amount) AS total_spent,
                   COUNT(*) AS order_count
            FROM orders o
            JOIN customers c ON c.id = o.customer_id
            WHERE o.store_id = $1
              AND o.customer_id IS NOT NULL
              AND ($2::timestamptz IS NULL OR o.created_at >= $2)
              AND ($3::timestamptz IS NULL OR o.created_at <= $3)
            GROUP BY c.id, c.email, c.first_name, c.last_name
            ORDER BY total_spent DESC
            LIMIT $4
            ",
        )
        .bind(store_id)
        .bind(window.start)
        .bind(window.end)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
