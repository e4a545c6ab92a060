//! Sync orchestration: sequences pagination and reconciliation for one
//! store, records every attempt in the ledger, and serves as the single
//! entry point for both manual sync requests and webhook deliveries.

use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;
use storepulse_core::{StoreId, SyncEntity, SyncStatus};

use super::SyncError;
use super::reconcile::Reconciler;
use crate::db::{Store, StoreRepository, SyncLogRepository};
use crate::shopify::{
    CollectionFetcher, RemoteCustomer, RemoteOrder, RemoteProduct, Resource, ShopifyClient,
    ShopifyError, WebhookTopic, fetch_all,
};

/// Result of one single-entity sync.
#[derive(Debug, Clone, Serialize)]
pub struct SyncOutcome {
    pub message: String,
    pub count: usize,
}

/// Per-entity slice of a full sync. Failure here is a first-class outcome,
/// not an error: one entity type failing must not hide the others' results.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EntityOutcome {
    pub success: bool,
    pub count: usize,
    pub message: String,
}

/// Per-entity outcomes of a full sync.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FullSyncResults {
    pub products: EntityOutcome,
    pub customers: EntityOutcome,
    pub orders: EntityOutcome,
}

impl FullSyncResults {
    /// Total records reconciled across all entity types.
    #[must_use]
    pub const fn total_synced(&self) -> usize {
        self.products.count + self.customers.count + self.orders.count
    }

    /// Whether every entity type completed.
    #[must_use]
    pub const fn all_succeeded(&self) -> bool {
        self.products.success && self.customers.success && self.orders.success
    }
}

/// Aggregate response of a full sync.
#[derive(Debug, Clone, Serialize)]
pub struct FullSyncReport {
    pub message: String,
    pub results: FullSyncResults,
    pub total_synced: usize,
}

/// What a webhook delivery amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// The embedded record was reconciled.
    Processed(SyncEntity),
    /// Unrecognized topic; acknowledged without action.
    Ignored,
}

/// Orchestrates sync flows for one process.
///
/// Explicitly constructed from a pool and a client (no global state) and
/// shared through application state. Each sync invocation runs to completion
/// within one request context; there is no background scheduler.
#[derive(Clone)]
pub struct SyncService {
    pool: PgPool,
    shopify: ShopifyClient,
}

impl SyncService {
    /// Create a new sync service.
    #[must_use]
    pub const fn new(pool: PgPool, shopify: ShopifyClient) -> Self {
        Self { pool, shopify }
    }

    /// Sync a store's product catalog.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::StoreNotFound` if the store does not exist, or the
    /// underlying remote/storage error after recording a FAILED ledger entry.
    pub async fn sync_products(&self, store_id: StoreId) -> Result<SyncOutcome, SyncError> {
        self.sync_entity(store_id, Resource::Products).await
    }

    /// Sync a store's customers.
    ///
    /// # Errors
    ///
    /// Same contract as [`Self::sync_products`].
    pub async fn sync_customers(&self, store_id: StoreId) -> Result<SyncOutcome, SyncError> {
        self.sync_entity(store_id, Resource::Customers).await
    }

    /// Sync a store's orders.
    ///
    /// Customer links resolve only against customers already synced; run a
    /// customer sync first to link new orders to their customers.
    ///
    /// # Errors
    ///
    /// Same contract as [`Self::sync_products`].
    pub async fn sync_orders(&self, store_id: StoreId) -> Result<SyncOutcome, SyncError> {
        self.sync_entity(store_id, Resource::Orders).await
    }

    /// Sync all three entity types for a store, isolating failures per
    /// entity type.
    ///
    /// Reconciliation is two-phase by construction: customers are drained
    /// before orders so the order pass can resolve its customer references
    /// against rows the customer pass just wrote. Products are independent
    /// and run first.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::StoreNotFound` if the store does not exist.
    /// Individual entity failures do NOT surface as errors; they are
    /// reported per entity in the returned report.
    pub async fn sync_all(&self, store_id: StoreId) -> Result<FullSyncReport, SyncError> {
        let store = self.load_store(store_id).await?;
        tracing::info!(store = %store.shop_domain, "starting full sync");

        let results = FullSyncResults {
            products: self.entity_outcome(&store, Resource::Products).await,
            customers: self.entity_outcome(&store, Resource::Customers).await,
            orders: self.entity_outcome(&store, Resource::Orders).await,
        };

        let status = if results.all_succeeded() {
            SyncStatus::Success
        } else {
            SyncStatus::Failed
        };
        SyncLogRepository::new(&self.pool)
            .append(
                store.id,
                SyncEntity::FullSync,
                status,
                &full_sync_message(&results),
            )
            .await?;

        tracing::info!(
            store = %store.shop_domain,
            total = results.total_synced(),
            "full sync completed"
        );
        Ok(FullSyncReport {
            message: "Full sync completed".to_string(),
            total_synced: results.total_synced(),
            results,
        })
    }

    /// Reconcile one webhook-delivered record.
    ///
    /// Duplicate deliveries are safe: the record lands on the same upsert
    /// key as bulk sync, so replays are absorbed without deduplication.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::UnknownShopDomain` if no store is connected for
    /// the domain, or the underlying parse/storage error.
    pub async fn ingest_webhook(
        &self,
        shop_domain: &str,
        topic: WebhookTopic,
        payload: Value,
    ) -> Result<WebhookOutcome, SyncError> {
        let store = StoreRepository::new(&self.pool)
            .find_by_domain(shop_domain)
            .await?
            .ok_or_else(|| SyncError::UnknownShopDomain(shop_domain.to_string()))?;

        let reconciler = Reconciler::new(&self.pool);
        match topic {
            WebhookTopic::CustomersCreate => {
                let remote: RemoteCustomer = parse_record(payload)?;
                reconciler.customer(store.id, &remote).await?;
                tracing::info!(remote_id = remote.id, store = %store.shop_domain, "processed customer webhook");
                Ok(WebhookOutcome::Processed(SyncEntity::Customers))
            }
            WebhookTopic::OrdersCreate => {
                let remote: RemoteOrder = parse_record(payload)?;
                reconciler.order(store.id, &remote).await?;
                tracing::info!(remote_id = remote.id, store = %store.shop_domain, "processed order webhook");
                Ok(WebhookOutcome::Processed(SyncEntity::Orders))
            }
            WebhookTopic::Other => Ok(WebhookOutcome::Ignored),
        }
    }

    async fn load_store(&self, store_id: StoreId) -> Result<Store, SyncError> {
        StoreRepository::new(&self.pool)
            .get(store_id)
            .await?
            .ok_or(SyncError::StoreNotFound(store_id))
    }

    /// One single-entity sync: load store, drain, reconcile, write ledger.
    async fn sync_entity(
        &self,
        store_id: StoreId,
        resource: Resource,
    ) -> Result<SyncOutcome, SyncError> {
        let store = self.load_store(store_id).await?;
        tracing::info!(store = %store.shop_domain, entity = resource.key(), "starting sync");

        let result = self.drain_and_reconcile(&store, resource).await;

        let ledger = SyncLogRepository::new(&self.pool);
        match &result {
            Ok(outcome) => {
                ledger
                    .append(
                        store.id,
                        resource_entity(resource),
                        SyncStatus::Success,
                        &ledger_message(resource, outcome),
                    )
                    .await?;
            }
            Err(err) => {
                // The sync failure is the interesting error; a ledger write
                // failure on top of it is only logged.
                if let Err(log_err) = ledger
                    .append(
                        store.id,
                        resource_entity(resource),
                        SyncStatus::Failed,
                        &err.to_string(),
                    )
                    .await
                {
                    tracing::error!(error = %log_err, "failed to record sync failure in ledger");
                }
            }
        }

        result
    }

    /// Drain the remote collection and reconcile every record sequentially.
    async fn drain_and_reconcile(
        &self,
        store: &Store,
        resource: Resource,
    ) -> Result<SyncOutcome, SyncError> {
        let fetcher = CollectionFetcher::new(
            &self.shopify,
            &store.shop_domain,
            &store.access_token,
            resource,
        );
        let records = fetch_all(&fetcher).await?;

        if records.is_empty() {
            return Ok(SyncOutcome {
                message: format!("Shopify store has no {} to sync.", resource.key()),
                count: 0,
            });
        }

        tracing::info!(
            total = records.len(),
            entity = resource.key(),
            "processing records from Shopify"
        );

        let reconciler = Reconciler::new(&self.pool);
        let mut processed = 0_usize;
        for record in records {
            match resource {
                Resource::Products => {
                    let remote: RemoteProduct = parse_record(record)?;
                    reconciler.product(store.id, &remote).await?;
                }
                Resource::Customers => {
                    let remote: RemoteCustomer = parse_record(record)?;
                    reconciler.customer(store.id, &remote).await?;
                }
                Resource::Orders => {
                    let remote: RemoteOrder = parse_record(record)?;
                    reconciler.order(store.id, &remote).await?;
                }
            }
            processed += 1;
            if processed % 50 == 0 {
                tracing::debug!(processed, entity = resource.key(), "sync progress");
            }
        }

        Ok(SyncOutcome {
            message: format!("{} synced successfully", resource.display_name()),
            count: processed,
        })
    }

    /// Run one entity sync inside a full sync, folding any error into a
    /// failed [`EntityOutcome`] instead of propagating it.
    async fn entity_outcome(&self, store: &Store, resource: Resource) -> EntityOutcome {
        match self.drain_and_reconcile(store, resource).await {
            Ok(outcome) if outcome.count == 0 => EntityOutcome {
                success: true,
                count: 0,
                message: format!("No {} found", resource.key()),
            },
            Ok(outcome) => EntityOutcome {
                success: true,
                count: outcome.count,
                message: outcome.message,
            },
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    entity = resource.key(),
                    "entity sync failed during full sync"
                );
                EntityOutcome {
                    success: false,
                    count: 0,
                    message: format!("{} sync failed", resource.display_name()),
                }
            }
        }
    }
}

/// Ledger entity for a resource.
const fn resource_entity(resource: Resource) -> SyncEntity {
    match resource {
        Resource::Products => SyncEntity::Products,
        Resource::Customers => SyncEntity::Customers,
        Resource::Orders => SyncEntity::Orders,
    }
}

/// Ledger message for a successful single-entity sync.
fn ledger_message(resource: Resource, outcome: &SyncOutcome) -> String {
    if outcome.count == 0 {
        outcome.message.clone()
    } else {
        format!(
            "Synced {} {} successfully with pagination.",
            outcome.count,
            resource.key()
        )
    }
}

/// Combined ledger message for a full sync.
fn full_sync_message(results: &FullSyncResults) -> String {
    format!(
        "Full sync completed: Products({}), Customers({}), Orders({})",
        results.products.count, results.customers.count, results.orders.count
    )
}

fn parse_record<T: serde::de::DeserializeOwned>(record: Value) -> Result<T, SyncError> {
    serde_json::from_value(record)
        .map_err(|err| SyncError::Remote(ShopifyError::Parse(err.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(count: usize, success: bool) -> EntityOutcome {
        EntityOutcome {
            success,
            count,
            message: String::new(),
        }
    }

    #[test]
    fn test_ledger_message_counts_records() {
        let message = ledger_message(
            Resource::Products,
            &SyncOutcome {
                message: "Products synced successfully".to_string(),
                count: 260,
            },
        );
        assert_eq!(message, "Synced 260 products successfully with pagination.");
    }

    #[test]
    fn test_ledger_message_empty_collection_keeps_outcome_message() {
        let message = ledger_message(
            Resource::Customers,
            &SyncOutcome {
                message: "Shopify store has no customers to sync.".to_string(),
                count: 0,
            },
        );
        assert_eq!(message, "Shopify store has no customers to sync.");
    }

    #[test]
    fn test_full_sync_message_aggregates_counts() {
        let results = FullSyncResults {
            products: outcome(12, true),
            customers: outcome(7, true),
            orders: outcome(0, false),
        };
        assert_eq!(
            full_sync_message(&results),
            "Full sync completed: Products(12), Customers(7), Orders(0)"
        );
    }

    #[test]
    fn test_full_sync_results_aggregation() {
        let results = FullSyncResults {
            products: outcome(2, true),
            customers: outcome(3, true),
            orders: outcome(0, false),
        };
        assert_eq!(results.total_synced(), 5);
        assert!(!results.all_succeeded());

        let healthy = FullSyncResults {
            products: outcome(1, true),
            customers: outcome(1, true),
            orders: outcome(1, true),
        };
        assert!(healthy.all_succeeded());
    }

    #[test]
    fn test_parse_record_rejects_wrong_shape() {
        let err = parse_record::<RemoteOrder>(serde_json::json!({"total_price": "1.00"}))
            .expect_err("missing id must fail");
        assert!(matches!(err, SyncError::Remote(ShopifyError::Parse(_))));
    }

    #[test]
    fn test_resource_entity_mapping() {
        assert_eq!(resource_entity(Resource::Products), SyncEntity::Products);
        assert_eq!(resource_entity(Resource::Customers), SyncEntity::Customers);
        assert_eq!(resource_entity(Resource::Orders), SyncEntity::Orders);
    }
}
