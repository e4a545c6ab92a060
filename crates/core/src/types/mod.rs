//! Shared type definitions.

pub mod credential;
pub mod id;
pub mod sync;

pub use credential::AccessToken;
pub use id::{CustomerId, OrderId, ProductId, StoreId, SyncLogId, TenantId};
pub use sync::{ParseSyncEnumError, SyncEntity, SyncStatus};
