//! Repository for the `trace_events` table.

use mailalert_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::trace_event::TraceEventRow;

/// Column list for `trace_events` queries.
const COLUMNS: &str = "id, kind, correlation_id, message, created_at";

/// Provides append and lookup operations for pipeline trace events.
pub struct TraceEventRepo;

impl TraceEventRepo {
    /// Append a trace event, returning the generated ID.
    pub async fn insert(
        pool: &PgPool,
        kind: &str,
        correlation_id: &str,
        message: &str,
        created_at: Timestamp,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO trace_events (kind, correlation_id, message, created_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id",
        )
        .bind(kind)
        .bind(correlation_id)
        .bind(message)
        .bind(created_at)
        .fetch_one(pool)
        .await
    }

    /// All events of one pipeline execution, oldest first.
    pub async fn list_by_correlation(
        pool: &PgPool,
        correlation_id: &str,
    ) -> Result<Vec<TraceEventRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM trace_events \
             WHERE correlation_id = $1 \
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, TraceEventRow>(&query)
            .bind(correlation_id)
            .fetch_all(pool)
            .await
    }
}
