//! Shared test doubles for pipeline integration tests.
//!
//! - [`MemoryStore`]: an [`AlertStore`] over a `HashMap`, with the same
//!   pending-only update rule as the SQL store.
//! - [`RecordingTransport`]: a [`MailTransport`] that records every message
//!   and succeeds or fails on demand.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mailalert_core::alert::AlertStatus;
use mailalert_core::template::TemplateSet;
use mailalert_core::types::DbId;
use mailalert_db::models::alert::{Alert, CreateAlert};
use mailalert_events::{
    MailTransport, OutboundEmail, TraceBus, TraceEvent, TraceKind, TransportError,
};
use mailalert_pipeline::{
    AlertOrchestrator, AlertRequest, AlertStore, PipelineConfig, StoreError,
    ValidationFaultPolicy,
};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryStore {
    alerts: Mutex<HashMap<DbId, Alert>>,
    next_id: AtomicI64,
    fail_create: AtomicBool,
    fail_update: AtomicBool,
}

impl MemoryStore {
    pub fn failing() -> Self {
        let store = Self::default();
        store.fail_create.store(true, Ordering::SeqCst);
        store
    }

    /// Creates succeed; every outcome update fails.
    pub fn failing_update() -> Self {
        let store = Self::default();
        store.fail_update.store(true, Ordering::SeqCst);
        store
    }

    pub fn get(&self, id: DbId) -> Option<Alert> {
        self.alerts.lock().unwrap().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.alerts.lock().unwrap().len()
    }
}

#[async_trait]
impl AlertStore for MemoryStore {
    async fn create(&self, input: CreateAlert) -> Result<Alert, StoreError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let alert = Alert {
            id,
            source_file_name: input.source_file_name,
            error_type: input.error_type,
            affected_channel: input.affected_channel,
            payload: input.payload,
            error_timestamp: input.error_timestamp,
            created_at: input.created_at,
            sent_at: None,
            created_by: input.created_by,
            status: AlertStatus::Pending,
        };
        self.alerts.lock().unwrap().insert(id, alert.clone());
        Ok(alert)
    }

    async fn update(&self, alert: &Alert) -> Result<Alert, StoreError> {
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        let mut alerts = self.alerts.lock().unwrap();
        match alerts.get_mut(&alert.id) {
            Some(stored) if stored.status == AlertStatus::Pending => {
                stored.status = alert.status;
                stored.sent_at = alert.sent_at;
                Ok(stored.clone())
            }
            _ => Err(StoreError::Stale(alert.id)),
        }
    }

    async fn find(&self, id: DbId) -> Result<Option<Alert>, StoreError> {
        Ok(self.get(id))
    }
}

// ---------------------------------------------------------------------------
// RecordingTransport
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<OutboundEmail>>,
    fail: bool,
}

impl RecordingTransport {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::default(),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, email: &OutboundEmail) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(email.clone());
        if self.fail {
            return Err(TransportError::Build("connection refused".to_string()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct Harness {
    pub orchestrator: AlertOrchestrator,
    pub store: Arc<MemoryStore>,
    pub transport: Arc<RecordingTransport>,
    pub trace: Arc<TraceBus>,
    pub events: broadcast::Receiver<TraceEvent>,
}

impl Harness {
    pub fn new(store: MemoryStore, transport: RecordingTransport) -> Self {
        Self::with_policy(store, transport, ValidationFaultPolicy::LeavePending)
    }

    pub fn with_policy(
        store: MemoryStore,
        transport: RecordingTransport,
        fault_policy: ValidationFaultPolicy,
    ) -> Self {
        let store = Arc::new(store);
        let transport = Arc::new(transport);
        let trace = Arc::new(TraceBus::default());
        let events = trace.subscribe();
        let config = PipelineConfig {
            fault_policy,
            ..Default::default()
        };
        let orchestrator = AlertOrchestrator::new(
            store.clone(),
            transport.clone(),
            Arc::clone(&trace),
            &config,
            TemplateSet::embedded().unwrap(),
        );
        Self {
            orchestrator,
            store,
            transport,
            trace,
            events,
        }
    }

    /// Drain every trace event recorded so far.
    pub fn drain_events(&mut self) -> Vec<TraceEvent> {
        let mut out = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            out.push(event);
        }
        out
    }
}

pub fn kinds(events: &[TraceEvent]) -> Vec<TraceKind> {
    events.iter().map(|e| e.kind).collect()
}

pub fn request() -> AlertRequest {
    AlertRequest {
        to: "ops@example.com, dev@example.com".to_string(),
        cc: String::new(),
        subject: "Exchange alert".to_string(),
        source_file_name: "orders.xml".to_string(),
        error_type: "TIMEOUT".to_string(),
        affected_channel: "CH-01".to_string(),
        payload: "<order id=\"7\"/>".to_string(),
        error_timestamp: None,
        created_by: Some("batch-loader".to_string()),
    }
}
