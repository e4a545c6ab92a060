//! Read-only aggregate metrics over local storage.
//!
//! These handlers never talk to the remote platform; they answer from
//! whatever the sync pipeline has reconciled so far.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use storepulse_core::StoreId;

use crate::db::{
    CustomerRepository, DateWindow, OrderRepository, ProductRepository, RevenuePoint,
    StoreRepository, TopCustomer,
};
use crate::error::AppError;
use crate::state::AppState;

/// Days of history behind the revenue-by-day series.
const REVENUE_WINDOW_DAYS: i64 = 7;

/// How many customers the top-customers ranking returns.
const TOP_CUSTOMER_LIMIT: i64 = 5;

/// Optional `?start_date=YYYY-MM-DD&end_date=YYYY-MM-DD` window.
#[derive(Debug, Default, Deserialize)]
pub struct DateRangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl DateRangeQuery {
    /// Inclusive window: start of the start day through the last millisecond
    /// of the end day, in UTC.
    fn window(&self) -> DateWindow {
        let end_of_day =
            NaiveTime::from_hms_milli_opt(23, 59, 59, 999).expect("valid end-of-day time");
        DateWindow {
            start: self
                .start_date
                .map(|date| date.and_time(NaiveTime::MIN).and_utc()),
            end: self.end_date.map(|date| date.and_time(end_of_day).and_utc()),
        }
    }
}

/// Headline counts and revenue for one store.
#[derive(Debug, Serialize)]
pub struct MetricsSummary {
    pub total_products: i64,
    pub total_customers: i64,
    pub total_orders: i64,
    pub total_revenue: Decimal,
}

/// Counts and revenue, optionally windowed.
///
/// The product count is not time-dependent and ignores the window.
pub async fn summary(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<MetricsSummary>, AppError> {
    ensure_store(state.pool(), store_id).await?;
    let window = range.window();

    let total_products = ProductRepository::new(state.pool()).count(store_id).await?;
    let total_customers = CustomerRepository::new(state.pool())
        .count_in_window(store_id, window)
        .await?;
    let orders = OrderRepository::new(state.pool());
    let total_orders = orders.count_in_window(store_id, window).await?;
    let total_revenue = orders.revenue_in_window(store_id, window).await?;

    Ok(Json(MetricsSummary {
        total_products,
        total_customers,
        total_orders,
        total_revenue,
    }))
}

/// Revenue per day over the last seven days, oldest first.
pub async fn revenue_by_day(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
) -> Result<Json<Vec<RevenuePoint>>, AppError> {
    ensure_store(state.pool(), store_id).await?;

    let since = Utc::now() - Duration::days(REVENUE_WINDOW_DAYS);
    let points = OrderRepository::new(state.pool())
        .revenue_by_day(store_id, since)
        .await?;
    Ok(Json(points))
}

/// The store's top customers by summed order totals.
pub async fn top_customers(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<Vec<TopCustomer>>, AppError> {
    ensure_store(state.pool(), store_id).await?;

    let rows = OrderRepository::new(state.pool())
        .top_customers(store_id, range.window(), TOP_CUSTOMER_LIMIT)
        .await?;
    Ok(Json(rows))
}

async fn ensure_store(pool: &PgPool, store_id: StoreId) -> Result<(), AppError> {
    StoreRepository::new(pool)
        .get(store_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound(format!("Store {store_id}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_is_inclusive_of_both_days() {
        let range = DateRangeQuery {
            start_date: Some(NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date")),
            end_date: Some(NaiveDate::from_ymd_opt(2025, 3, 31).expect("valid date")),
        };
        let window = range.window();

        let start = window.start.expect("start bound");
        let end = window.end.expect("end bound");
        assert_eq!(start.to_rfc3339(), "2025-03-01T00:00:00+00:00");
        assert!(end.to_rfc3339().starts_with("2025-03-31T23:59:59"));
    }

    #[test]
    fn test_empty_query_is_open_window() {
        let window = DateRangeQuery::default().window();
        assert!(window.start.is_none());
        assert!(window.end.is_none());
    }
}
