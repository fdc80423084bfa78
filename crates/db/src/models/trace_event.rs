//! Trace event entity model.

use serde::Serialize;
use sqlx::FromRow;
use mailalert_core::types::{DbId, Timestamp};

/// A row from the `trace_events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TraceEventRow {
    pub id: DbId,
    pub kind: String,
    pub correlation_id: String,
    pub message: String,
    pub created_at: Timestamp,
}
