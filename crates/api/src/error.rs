use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mailalert_core::email_address::AddressValidationFault;
use mailalert_core::error::CoreError;
use mailalert_pipeline::{PipelineError, StoreError};
use serde_json::{json, Map, Value};
use validator::ValidationErrors;

/// Application-level error type for HTTP handlers.
///
/// Wraps domain and pipeline errors and adds request-body variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `mailalert_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failed pipeline invocation.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// An alert store failure outside the pipeline (e.g. a lookup).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The request body failed field validation.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// The request body is not a JSON document of the expected shape.
    #[error(transparent)]
    JsonBody(#[from] JsonRejection),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, extra) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                    None,
                ),
                CoreError::Validation(msg) => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    msg.clone(),
                    None,
                ),
                other => internal(other),
            },

            // --- Pipeline errors ---
            AppError::Pipeline(PipelineError::AddressValidation(fault)) => (
                StatusCode::BAD_REQUEST,
                "EMAIL_VALIDATION_ERROR",
                fault.message.clone(),
                Some(invalid_emails_body(fault)),
            ),
            AppError::Pipeline(err) => {
                tracing::error!(
                    error = %err,
                    source = ?std::error::Error::source(err),
                    "Alert processing failed"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    err.to_string(),
                    None,
                )
            }

            AppError::Store(err) => internal(err),

            // --- HTTP-specific errors ---
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Request validation failed".to_string(),
                Some(field_errors_body(errors)),
            ),
            AppError::JsonBody(rejection) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                rejection.body_text(),
                None,
            ),
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let (Some(Value::Object(extra)), Value::Object(body)) = (extra, &mut body) {
            body.extend(extra);
        }

        (status, axum::Json(body)).into_response()
    }
}

/// Log an unexpected error and produce a sanitized 500.
fn internal(err: &dyn std::fmt::Display) -> (StatusCode, &'static str, String, Option<Value>) {
    tracing::error!(error = %err, "Internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
        None,
    )
}

/// `{ "invalid_emails": { address: reason }, "total_invalid_emails": n }`
fn invalid_emails_body(fault: &AddressValidationFault) -> Value {
    let invalid = fault.invalid();
    let emails: Map<String, Value> = invalid
        .iter()
        .map(|r| (r.address.clone(), Value::String(r.reason.clone())))
        .collect();
    json!({
        "invalid_emails": emails,
        "total_invalid_emails": invalid.len(),
    })
}

/// `{ "field_errors": { field: [message, ...] } }`
fn field_errors_body(errors: &ValidationErrors) -> Value {
    let fields: Map<String, Value> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages: Vec<Value> = errs
                .iter()
                .map(|e| {
                    let text = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    Value::String(text)
                })
                .collect();
            (field.to_string(), Value::Array(messages))
        })
        .collect();
    json!({ "field_errors": fields })
}
