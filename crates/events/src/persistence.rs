//! Durable trace persistence service.
//!
//! [`TracePersistence`] subscribes to the [`TraceBus`](crate::bus::TraceBus)
//! broadcast channel and writes every received [`TraceEvent`] to the
//! `trace_events` table. It runs as a long-lived background task and shuts
//! down gracefully when the bus is dropped. Write failures are logged and
//! never reach the pipeline that recorded the event.

use mailalert_core::types::DbId;
use mailalert_db::repositories::TraceEventRepo;
use mailalert_db::DbPool;
use tokio::sync::broadcast;

use crate::bus::TraceEvent;

/// Background service that persists trace events to the database.
pub struct TracePersistence;

impl TracePersistence {
    /// Run the persistence loop until the channel is closed.
    pub async fn run(pool: DbPool, mut receiver: broadcast::Receiver<TraceEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = Self::persist(&pool, &event).await {
                        tracing::error!(
                            error = %e,
                            kind = %event.kind,
                            correlation_id = %event.correlation_id,
                            "Failed to persist trace event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(
                        skipped = n,
                        "Trace persistence lagged, some events were not persisted"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Trace bus closed, persistence shutting down");
                    break;
                }
            }
        }
    }

    /// Write a single event to the `trace_events` table.
    async fn persist(pool: &DbPool, event: &TraceEvent) -> Result<DbId, sqlx::Error> {
        TraceEventRepo::insert(
            pool,
            event.kind.as_str(),
            &event.correlation_id,
            &event.message,
            event.timestamp,
        )
        .await
    }
}
