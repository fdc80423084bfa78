//! In-process trace bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`TraceBus`] is the fire-and-forget sink for pipeline milestones. Every
//! recorded [`TraceEvent`] is logged through `tracing` at a level matching its
//! kind and fanned out to subscribers (the persistence service, tests).
//! Recording never fails and never blocks. It is shared via `Arc<TraceBus>`.

use std::fmt;

use chrono::Utc;
use mailalert_core::types::Timestamp;
use serde::Serialize;
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// TraceKind
// ---------------------------------------------------------------------------

/// Milestone category of a trace event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TraceKind {
    ProcessStart,
    ProcessOk,
    ProcessWarn,
    ProcessError,
    ProcessComplete,
}

impl TraceKind {
    /// Database representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProcessStart => "PROCESS_START",
            Self::ProcessOk => "PROCESS_OK",
            Self::ProcessWarn => "PROCESS_WARN",
            Self::ProcessError => "PROCESS_ERROR",
            Self::ProcessComplete => "PROCESS_COMPLETE",
        }
    }

    /// Whether this kind closes a pipeline execution.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::ProcessComplete | Self::ProcessError)
    }
}

impl fmt::Display for TraceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TraceEvent
// ---------------------------------------------------------------------------

/// One pipeline milestone.
#[derive(Debug, Clone, Serialize)]
pub struct TraceEvent {
    pub kind: TraceKind,
    /// Groups the events of a single pipeline execution.
    pub correlation_id: String,
    pub message: String,
    pub timestamp: Timestamp,
}

impl TraceEvent {
    pub fn new(kind: TraceKind, correlation_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            correlation_id: correlation_id.into(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// TraceBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// Fan-out trace sink.
///
/// # Usage
///
/// ```rust
/// use mailalert_events::bus::{TraceBus, TraceKind};
///
/// let bus = TraceBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.record(TraceKind::ProcessStart, "corr-1", "processing alert request");
/// assert_eq!(rx.try_recv().unwrap().kind, TraceKind::ProcessStart);
/// ```
pub struct TraceBus {
    sender: broadcast::Sender<TraceEvent>,
}

impl TraceBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed events are dropped and
    /// slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Record a milestone. Never fails.
    pub fn record(&self, kind: TraceKind, correlation_id: &str, message: impl Into<String>) {
        self.publish(TraceEvent::new(kind, correlation_id, message));
    }

    /// Log and publish a prepared event to all current subscribers.
    pub fn publish(&self, event: TraceEvent) {
        match event.kind {
            TraceKind::ProcessError => tracing::error!(
                correlation_id = %event.correlation_id,
                kind = %event.kind,
                "{}",
                event.message
            ),
            TraceKind::ProcessWarn => tracing::warn!(
                correlation_id = %event.correlation_id,
                kind = %event.kind,
                "{}",
                event.message
            ),
            _ => tracing::info!(
                correlation_id = %event.correlation_id,
                kind = %event.kind,
                "{}",
                event.message
            ),
        }

        // A SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events recorded on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<TraceEvent> {
        self.sender.subscribe()
    }
}

impl Default for TraceBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
