//! Per-entity reconciliation: map one raw remote record onto the local
//! schema and upsert it.
//!
//! Reconciliation is idempotent: the `(store_id, remote_id)` key makes
//! create-or-update atomic per record, so replaying the same record any
//! number of times leaves exactly one row with the last applied fields.

use rust_decimal::Decimal;
use sqlx::PgPool;
use storepulse_core::StoreId;

use crate::db::{
    Customer, CustomerRepository, Order, OrderRepository, Product, ProductRepository,
    RepositoryError,
};
use crate::shopify::{RemoteCustomer, RemoteOrder, RemoteProduct};

/// Currency recorded when the platform omits one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Parse a platform money string leniently.
///
/// Missing or malformed amounts map to zero; a bad price on one record must
/// never fail a whole sync.
#[must_use]
pub fn parse_amount(raw: Option<&str>) -> Decimal {
    raw.and_then(|value| value.trim().parse::<Decimal>().ok())
        .unwrap_or(Decimal::ZERO)
}

/// The price of a product is its first variant's price.
#[must_use]
pub fn first_variant_price(product: &RemoteProduct) -> Decimal {
    parse_amount(
        product
            .variants
            .first()
            .and_then(|variant| variant.price.as_deref()),
    )
}

/// Maps remote records onto local rows, one function per entity type.
///
/// Both the bulk pull path and the webhook push path go through these
/// functions, which is what guarantees the two paths cannot diverge.
pub struct Reconciler<'a> {
    pool: &'a PgPool,
}

impl<'a> Reconciler<'a> {
    /// Create a new reconciler over the given pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Upsert one product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn product(
        &self,
        store_id: StoreId,
        remote: &RemoteProduct,
    ) -> Result<Product, RepositoryError> {
        ProductRepository::new(self.pool)
            .upsert(
                store_id,
                &remote.id.to_string(),
                &remote.title,
                first_variant_price(remote),
                DEFAULT_CURRENCY,
            )
            .await
    }

    /// Upsert one customer. Absent name/email fields stay null.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn customer(
        &self,
        store_id: StoreId,
        remote: &RemoteCustomer,
    ) -> Result<Customer, RepositoryError> {
        CustomerRepository::new(self.pool)
            .upsert(
                store_id,
                &remote.id.to_string(),
                remote.email.as_deref(),
                remote.first_name.as_deref(),
                remote.last_name.as_deref(),
            )
            .await
    }

    /// Upsert one order.
    ///
    /// The embedded customer reference is resolved against already-synced
    /// customers; an unknown reference leaves the link null rather than
    /// failing the order. The link is not back-filled when that customer
    /// arrives later.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the lookup or upsert fails.
    pub async fn order(
        &self,
        store_id: StoreId,
        remote: &RemoteOrder,
    ) -> Result<Order, RepositoryError> {
        let customer_id = match &remote.customer {
            Some(reference) => CustomerRepository::new(self.pool)
                .find_by_remote_id(store_id, &reference.id.to_string())
                .await?
                .map(|customer| customer.id),
            None => None,
        };

        OrderRepository::new(self.pool)
            .upsert(
                store_id,
                &remote.id.to_string(),
                parse_amount(remote.total_price.as_deref()),
                remote.currency.as_deref().unwrap_or(DEFAULT_CURRENCY),
                customer_id,
            )
            .await
    }
}
