//! Shared helpers for API integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mailalert_api::config::ServerConfig;
use mailalert_api::router::build_app_router;
use mailalert_api::state::AppState;
use mailalert_core::template::TemplateSet;
use mailalert_events::{MailTransport, OutboundEmail, TraceBus, TransportError};
use mailalert_pipeline::{AlertOrchestrator, AlertStore, PgAlertStore, PipelineConfig};
use sqlx::PgPool;
use tower::ServiceExt;

/// Transport that records messages and succeeds unless built with `failing`.
#[derive(Default)]
pub struct StubTransport {
    pub sent: Mutex<Vec<OutboundEmail>>,
    fail: bool,
}

impl StubTransport {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::default(),
            fail: true,
        }
    }
}

#[async_trait]
impl MailTransport for StubTransport {
    async fn send(&self, email: &OutboundEmail) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(email.clone());
        if self.fail {
            return Err(TransportError::NotConfigured);
        }
        Ok(())
    }
}

fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// Build the full router over `pool` with a transport that always succeeds.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, Arc::new(StubTransport::default()))
}

/// Build the full router over `pool` with the given transport.
pub fn build_test_app_with(pool: PgPool, transport: Arc<StubTransport>) -> Router {
    let config = test_config();
    let store: Arc<dyn AlertStore> = Arc::new(PgAlertStore::new(pool.clone()));
    let orchestrator = AlertOrchestrator::new(
        Arc::clone(&store),
        transport,
        Arc::new(TraceBus::default()),
        &PipelineConfig::default(),
        TemplateSet::embedded().unwrap(),
    );
    let state = AppState {
        pool,
        orchestrator: Arc::new(orchestrator),
        store,
    };
    build_app_router(state, &config)
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    post_raw(app, uri, body.to_string()).await
}

/// POST `body` verbatim with a JSON content type.
pub async fn post_raw(app: Router, uri: &str, body: impl Into<String>) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.into()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub fn assert_status(response: &Response<Body>, expected: StatusCode) {
    assert_eq!(response.status(), expected, "unexpected status");
}
