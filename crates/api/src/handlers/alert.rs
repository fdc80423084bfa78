//! Handlers for the `/alerts` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mailalert_core::error::CoreError;
use mailalert_core::types::DbId;
use mailalert_pipeline::AlertRequest;

use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// POST /api/v1/alerts
///
/// Run the alert pipeline. A delivered notification answers 200; an alert
/// that ended `SEND_FAILED` answers 500 with the stored alert in the body.
pub async fn create_alert(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<AlertRequest>,
) -> AppResult<Response> {
    let processed = state.orchestrator.process(input).await?;

    let status = if processed.is_sent() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    let body = MessageResponse {
        message: processed.message,
        data: processed.alert,
    };
    Ok((status, Json(body)).into_response())
}

/// GET /api/v1/alerts/{id}
pub async fn get_alert(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let alert = state
        .store
        .find(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Alert",
            id,
        }))?;
    Ok(Json(DataResponse { data: alert }))
}
