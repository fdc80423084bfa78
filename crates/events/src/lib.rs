//! MailAlert trace events and outbound mail delivery.
//!
//! - [`TraceBus`]: in-process, fire-and-forget publisher of pipeline
//!   milestones, backed by `tokio::sync::broadcast`.
//! - [`TraceEvent`] / [`TraceKind`]: the trace record and its kinds.
//! - [`TracePersistence`]: background service that durably writes every
//!   trace event to the `trace_events` table.
//! - [`delivery`]: the [`MailTransport`] capability and its SMTP
//!   implementation.

pub mod bus;
pub mod delivery;
pub mod persistence;

pub use bus::{TraceBus, TraceEvent, TraceKind};
pub use delivery::email::{EmailConfig, SmtpMailer};
pub use delivery::{DisabledTransport, MailTransport, OutboundEmail, TransportError};
pub use persistence::TracePersistence;
