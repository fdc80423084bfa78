//! Repository for the `alerts` table.

use mailalert_core::alert::AlertStatus;
use mailalert_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::alert::{Alert, CreateAlert};

/// Column list for `alerts` queries.
const COLUMNS: &str = "id, source_file_name, error_type, affected_channel, payload, \
     error_timestamp, created_at, sent_at, created_by, status";

/// Provides create / fetch / outcome-update operations for alerts.
pub struct AlertRepo;

impl AlertRepo {
    /// Insert a new `PENDING` alert, returning the stored row.
    pub async fn create(pool: &PgPool, input: &CreateAlert) -> Result<Alert, sqlx::Error> {
        let query = format!(
            "INSERT INTO alerts \
                (source_file_name, error_type, affected_channel, payload, \
                 error_timestamp, created_at, created_by, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(&input.source_file_name)
            .bind(&input.error_type)
            .bind(&input.affected_channel)
            .bind(&input.payload)
            .bind(input.error_timestamp)
            .bind(input.created_at)
            .bind(&input.created_by)
            .bind(AlertStatus::Pending.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find an alert by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Alert>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM alerts WHERE id = $1");
        sqlx::query_as::<_, Alert>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Record the delivery outcome of a still-pending alert.
    ///
    /// Only rows in `PENDING` are touched, so a terminal status can never be
    /// overwritten. Returns `None` if the alert does not exist or has already
    /// left `PENDING`.
    pub async fn record_outcome(
        pool: &PgPool,
        id: DbId,
        status: AlertStatus,
        sent_at: Option<Timestamp>,
    ) -> Result<Option<Alert>, sqlx::Error> {
        let query = format!(
            "UPDATE alerts SET status = $2, sent_at = $3 \
             WHERE id = $1 AND status = $4 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(sent_at)
            .bind(AlertStatus::Pending.as_str())
            .fetch_optional(pool)
            .await
    }
}
