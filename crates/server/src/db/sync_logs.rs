//! Sync ledger repository.
//!
//! Append-only: entries are written once per sync attempt and never mutated.
//! The ledger exists for operator visibility only; nothing in the pipeline
//! reads it to decide retries or skips.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use storepulse_core::{StoreId, SyncEntity, SyncLogId, SyncStatus};

use super::RepositoryError;

/// How many entries a history listing returns.
const HISTORY_LIMIT: i64 = 50;

/// One recorded sync attempt.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct SyncLogEntry {
    pub id: SyncLogId,
    pub store_id: StoreId,
    pub entity: SyncEntity,
    pub status: SyncStatus,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Repository for the sync ledger.
pub struct SyncLogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SyncLogRepository<'a> {
    /// Create a new sync log repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Append one ledger entry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn append(
        &self,
        store_id: StoreId,
        entity: SyncEntity,
        status: SyncStatus,
        message: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO sync_logs (store_id, entity, status, message)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(store_id)
        .bind(entity)
        .bind(status)
        .bind(message)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// The most recent entries for a store, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_recent(&self, store_id: StoreId) -> Result<Vec<SyncLogEntry>, RepositoryError> {
        let entries = sqlx::query_as::<_, SyncLogEntry>(
            r"
            SELECT id, store_id, entity, status, message, created_at
            FROM sync_logs
            WHERE store_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            ",
        )
        .bind(store_id)
        .bind(HISTORY_LIMIT)
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }
}
