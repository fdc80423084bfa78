//! Integration tests for the `/api/v1/alerts` endpoints.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, build_test_app_with, get, post_json, post_raw, StubTransport,
};
use serde_json::json;
use sqlx::PgPool;

fn alert_body() -> serde_json::Value {
    json!({
        "to": "ops@example.com; dev@example.com",
        "cc": "audit@example.com",
        "subject": "Exchange alert",
        "source_file_name": "orders.xml",
        "error_type": "TIMEOUT",
        "affected_channel": "CH-01",
        "payload": "<order id=\"7\"/>",
        "created_by": "batch-loader"
    })
}

// ---------------------------------------------------------------------------
// POST /api/v1/alerts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn delivered_alert_returns_200_and_is_sent(pool: PgPool) {
    let transport = Arc::new(StubTransport::default());
    let app = build_test_app_with(pool, Arc::clone(&transport));

    let response = post_json(app, "/api/v1/alerts", alert_body()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["message"], "notification sent successfully");
    assert_eq!(json["data"]["status"], "SENT");
    assert!(json["data"]["sent_at"].is_string());
    assert_eq!(json["data"]["source_file_name"], "orders.xml");
    assert_eq!(json["data"]["created_by"], "batch-loader");

    let sent = transport.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, vec!["ops@example.com", "dev@example.com"]);
    assert_eq!(sent[0].cc, vec!["audit@example.com"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn failed_delivery_returns_500_with_alert(pool: PgPool) {
    let app = build_test_app_with(pool, Arc::new(StubTransport::failing()));

    let response = post_json(app, "/api/v1/alerts", alert_body()).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["message"], "failed to send notification email");
    assert_eq!(json["data"]["status"], "SEND_FAILED");
    assert!(json["data"]["sent_at"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_recipients_return_400_with_details(pool: PgPool) {
    let transport = Arc::new(StubTransport::default());
    let app = build_test_app_with(pool, Arc::clone(&transport));

    let mut body = alert_body();
    body["to"] = json!("ops@example.com, nobody, ops@example");

    let response = post_json(app, "/api/v1/alerts", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "EMAIL_VALIDATION_ERROR");
    assert_eq!(json["total_invalid_emails"], 2);
    assert_eq!(json["invalid_emails"]["nobody"], "missing '@'");
    assert_eq!(json["invalid_emails"]["ops@example"], "domain missing dot");
    assert!(json["invalid_emails"].get("ops@example.com").is_none());

    assert!(transport.sent.lock().unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_cc_returns_400(pool: PgPool) {
    let app = build_test_app(pool);

    let mut body = alert_body();
    body["cc"] = json!("@audit.example.com");

    let response = post_json(app, "/api/v1/alerts", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "EMAIL_VALIDATION_ERROR");
    assert_eq!(json["error"], "invalid addresses in CC field");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn blank_fields_return_400_with_field_errors(pool: PgPool) {
    let app = build_test_app(pool);

    let mut body = alert_body();
    body["subject"] = json!("  ");
    body["payload"] = json!("");

    let response = post_json(app, "/api/v1/alerts", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["field_errors"]["subject"].is_array());
    assert!(json["field_errors"]["payload"].is_array());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_fields_return_400_with_field_errors(pool: PgPool) {
    let transport = Arc::new(StubTransport::default());
    let app = build_test_app_with(pool, Arc::clone(&transport));

    let mut body = alert_body();
    let fields = body.as_object_mut().unwrap();
    fields.remove("subject");
    fields.remove("to");

    let response = post_json(app, "/api/v1/alerts", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["field_errors"]["subject"][0], "subject is required");
    assert_eq!(json["field_errors"]["to"][0], "recipients are required");
    assert!(transport.sent.lock().unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn malformed_json_returns_400_json_error(pool: PgPool) {
    let app = build_test_app(pool);

    let response = post_raw(app, "/api/v1/alerts", r#"{"to": "ops@example.com","#).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].is_string());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn wrongly_typed_field_returns_400_json_error(pool: PgPool) {
    let app = build_test_app(pool);

    let mut body = alert_body();
    body["payload"] = json!(42);

    let response = post_json(app, "/api/v1/alerts", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("payload"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unparseable_error_timestamp_returns_500(pool: PgPool) {
    let app = build_test_app(pool);

    let mut body = alert_body();
    body["error_timestamp"] = json!("last tuesday");

    let response = post_json(app, "/api/v1/alerts", body).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "internal error while processing the alert");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn day_first_error_timestamp_is_stored(pool: PgPool) {
    let app = build_test_app(pool);

    let mut body = alert_body();
    body["error_timestamp"] = json!("31/05/2024 23:05:09");

    let response = post_json(app, "/api/v1/alerts", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let stored = json["data"]["error_timestamp"].as_str().unwrap();
    assert!(stored.starts_with("2024-05-31T23:05:09"), "got {stored}");
}

// ---------------------------------------------------------------------------
// GET /api/v1/alerts/{id}
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn get_alert_returns_stored_alert(pool: PgPool) {
    let app = build_test_app(pool);

    let created = body_json(post_json(app.clone(), "/api/v1/alerts", alert_body()).await).await;
    let id = created["data"]["id"].as_i64().unwrap();

    let response = get(app, &format!("/api/v1/alerts/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"], created["data"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn get_missing_alert_returns_404(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(app, "/api/v1/alerts/424242").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Alert with id 424242 not found");
}
