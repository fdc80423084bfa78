use std::sync::Arc;

use mailalert_pipeline::{AlertOrchestrator, AlertStore};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: mailalert_db::DbPool,
    /// The alert pipeline.
    pub orchestrator: Arc<AlertOrchestrator>,
    /// Read access to stored alerts.
    pub store: Arc<dyn AlertStore>,
}
