//! The alert-processing pipeline.
//!
//! An [`AlertRequest`] flows through [`AlertOrchestrator::process`], which
//! persists a `PENDING` alert, hands it to the [`NotificationDispatcher`] for
//! address validation, rendering and delivery, then records the final status.
//! Persistence and mail delivery are reached only through the [`AlertStore`]
//! and [`MailTransport`](mailalert_events::MailTransport) traits.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod orchestrator;
pub mod render;
pub mod request;
pub mod store;

pub use config::{PipelineConfig, SenderIdentity, ValidationFaultPolicy};
pub use dispatcher::NotificationDispatcher;
pub use error::PipelineError;
pub use orchestrator::{AlertOrchestrator, ProcessedAlert};
pub use render::ContentRenderer;
pub use request::AlertRequest;
pub use store::{AlertStore, PgAlertStore, StoreError};
