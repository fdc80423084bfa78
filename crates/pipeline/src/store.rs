//! Alert persistence capability.
//!
//! [`AlertStore`] is the only way the pipeline touches durable state. The
//! production implementation, [`PgAlertStore`], delegates to
//! [`AlertRepo`]; tests substitute an in-memory store.

use async_trait::async_trait;
use mailalert_core::types::DbId;
use mailalert_db::models::alert::{Alert, CreateAlert};
use mailalert_db::repositories::AlertRepo;
use mailalert_db::DbPool;

/// Errors raised by an [`AlertStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The alert does not exist or has already left `PENDING`.
    #[error("Alert {0} not found or no longer pending")]
    Stale(DbId),
}

/// Create / update / fetch of the durable alert record.
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// Persist a new `PENDING` alert and return it with its assigned id.
    async fn create(&self, input: CreateAlert) -> Result<Alert, StoreError>;

    /// Persist the final status and `sent_at` of a pending alert.
    async fn update(&self, alert: &Alert) -> Result<Alert, StoreError>;

    async fn find(&self, id: DbId) -> Result<Option<Alert>, StoreError>;
}

// ---------------------------------------------------------------------------
// PostgreSQL
// ---------------------------------------------------------------------------

/// [`AlertStore`] backed by the `alerts` table.
#[derive(Clone)]
pub struct PgAlertStore {
    pool: DbPool,
}

impl PgAlertStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlertStore for PgAlertStore {
    async fn create(&self, input: CreateAlert) -> Result<Alert, StoreError> {
        Ok(AlertRepo::create(&self.pool, &input).await?)
    }

    async fn update(&self, alert: &Alert) -> Result<Alert, StoreError> {
        AlertRepo::record_outcome(&self.pool, alert.id, alert.status, alert.sent_at)
            .await?
            .ok_or(StoreError::Stale(alert.id))
    }

    async fn find(&self, id: DbId) -> Result<Option<Alert>, StoreError> {
        Ok(AlertRepo::find_by_id(&self.pool, id).await?)
    }
}
