//! Alert entity model and DTOs.

use mailalert_core::alert::AlertStatus;
use mailalert_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `alerts` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Alert {
    pub id: DbId,
    pub source_file_name: String,
    pub error_type: String,
    pub affected_channel: String,
    pub payload: String,
    pub error_timestamp: Timestamp,
    pub created_at: Timestamp,
    pub sent_at: Option<Timestamp>,
    pub created_by: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: AlertStatus,
}

/// DTO for inserting a new alert. Status always starts `PENDING`.
#[derive(Debug, Clone)]
pub struct CreateAlert {
    pub source_file_name: String,
    pub error_type: String,
    pub affected_channel: String,
    pub payload: String,
    pub error_timestamp: Timestamp,
    pub created_at: Timestamp,
    pub created_by: Option<String>,
}
