//! Tests for `AppError` -> HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no server or
//! database is needed.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use mailalert_api::error::AppError;
use mailalert_core::email_address::{parse_address_list, AddressValidationFault};
use mailalert_core::error::CoreError;
use mailalert_pipeline::{PipelineError, StoreError};

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Alert",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Alert with id 42 not found");
}

#[tokio::test]
async fn address_fault_lists_every_invalid_address() {
    let fault = AddressValidationFault::new(parse_address_list("a@b.com, broken; x@@y.com"));
    let err = AppError::Pipeline(PipelineError::AddressValidation(fault));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "EMAIL_VALIDATION_ERROR");
    assert_eq!(json["total_invalid_emails"], 2);
    assert_eq!(json["invalid_emails"]["broken"], "missing '@'");
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("invalid email addresses found"));
}

#[tokio::test]
async fn processing_fault_returns_generic_500() {
    let err = AppError::Pipeline(PipelineError::processing("pool exhausted"));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "internal error while processing the alert");
}

#[tokio::test]
async fn store_error_is_sanitized() {
    let err = AppError::Store(StoreError::Database(sqlx::Error::PoolTimedOut));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}
