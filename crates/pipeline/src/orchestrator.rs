//! Top-level alert pipeline.
//!
//! ```text
//! PENDING --(delivered)-----------> SENT
//! PENDING --(not delivered)-------> SEND_FAILED
//! PENDING --(addresses rejected)--> PENDING or SEND_FAILED (ValidationFaultPolicy)
//! ```
//!
//! Every call to [`AlertOrchestrator::process`] records `PROCESS_START`
//! followed by exactly one terminal trace event.

use std::sync::Arc;

use chrono::Utc;
use mailalert_core::alert::{resolve_error_timestamp, AlertStatus};
use mailalert_core::email_address::AddressValidationFault;
use mailalert_core::template::TemplateSet;
use mailalert_db::models::alert::{Alert, CreateAlert};
use mailalert_events::{MailTransport, TraceBus, TraceKind};
use serde::Serialize;
use uuid::Uuid;

use crate::config::{PipelineConfig, ValidationFaultPolicy};
use crate::dispatcher::NotificationDispatcher;
use crate::error::PipelineError;
use crate::render::ContentRenderer;
use crate::request::AlertRequest;
use crate::store::AlertStore;

/// Result message for an alert that reached `SENT`.
pub const SENT_MESSAGE: &str = "notification sent successfully";

/// Result message for an alert that ended `SEND_FAILED`.
pub const SEND_FAILED_MESSAGE: &str = "failed to send notification email";

/// Final state of a processed alert.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedAlert {
    pub alert: Alert,
    pub message: String,
}

impl ProcessedAlert {
    pub fn is_sent(&self) -> bool {
        self.alert.status == AlertStatus::Sent
    }
}

/// Runs one alert request end to end. Shared as `Arc<AlertOrchestrator>`.
pub struct AlertOrchestrator {
    store: Arc<dyn AlertStore>,
    dispatcher: NotificationDispatcher,
    trace: Arc<TraceBus>,
    fault_policy: ValidationFaultPolicy,
}

impl AlertOrchestrator {
    pub fn new(
        store: Arc<dyn AlertStore>,
        transport: Arc<dyn MailTransport>,
        trace: Arc<TraceBus>,
        config: &PipelineConfig,
        templates: TemplateSet,
    ) -> Self {
        let dispatcher = NotificationDispatcher::new(
            transport,
            ContentRenderer::new(templates),
            config.sender.clone(),
            Arc::clone(&trace),
        );
        Self {
            store,
            dispatcher,
            trace,
            fault_policy: config.fault_policy,
        }
    }

    /// Persist, dispatch and reconcile one alert request.
    pub async fn process(&self, request: AlertRequest) -> Result<ProcessedAlert, PipelineError> {
        let correlation_id = Uuid::new_v4().to_string();
        self.trace.record(
            TraceKind::ProcessStart,
            &correlation_id,
            format!(
                "processing alert request for file {}",
                request.source_file_name
            ),
        );

        let result = self.run(&request, &correlation_id).await;

        let (kind, message) = match &result {
            Ok(processed) if processed.is_sent() => (
                TraceKind::ProcessComplete,
                format!("alert {} sent", processed.alert.id),
            ),
            Ok(processed) => (
                TraceKind::ProcessError,
                format!("alert {}: {}", processed.alert.id, processed.message),
            ),
            Err(PipelineError::AddressValidation(fault)) => (
                TraceKind::ProcessError,
                format!("address validation failed: {}", fault.message),
            ),
            Err(PipelineError::Processing { message, source }) => {
                (TraceKind::ProcessError, format!("{message}: {source}"))
            }
        };
        self.trace.record(kind, &correlation_id, message);

        result
    }

    async fn run(
        &self,
        request: &AlertRequest,
        correlation_id: &str,
    ) -> Result<ProcessedAlert, PipelineError> {
        let created_at = Utc::now();
        let error_timestamp =
            resolve_error_timestamp(request.error_timestamp.as_deref(), created_at)
                .map_err(PipelineError::processing)?;

        let alert = self
            .store
            .create(CreateAlert {
                source_file_name: request.source_file_name.clone(),
                error_type: request.error_type.clone(),
                affected_channel: request.affected_channel.clone(),
                payload: request.payload.clone(),
                error_timestamp,
                created_at,
                created_by: request.created_by.clone(),
            })
            .await
            .map_err(PipelineError::processing)?;

        self.trace.record(
            TraceKind::ProcessOk,
            correlation_id,
            format!("alert persisted with id {}", alert.id),
        );

        let delivered = match self.dispatcher.dispatch(request, &alert, correlation_id).await {
            Ok(delivered) => delivered,
            Err(fault) => {
                self.apply_fault_policy(alert, &fault).await;
                return Err(fault.into());
            }
        };

        let outcome = if delivered {
            AlertStatus::Sent
        } else {
            AlertStatus::SendFailed
        };
        let finished = Self::finish(alert, outcome).map_err(PipelineError::processing)?;
        let stored = self
            .store
            .update(&finished)
            .await
            .map_err(PipelineError::processing)?;

        tracing::info!(
            alert_id = stored.id,
            correlation_id,
            status = %stored.status,
            "Alert processed"
        );

        let message = if delivered {
            SENT_MESSAGE
        } else {
            SEND_FAILED_MESSAGE
        };
        Ok(ProcessedAlert {
            alert: stored,
            message: message.to_string(),
        })
    }

    /// Move `alert` into a terminal status, stamping `sent_at` on success.
    fn finish(
        mut alert: Alert,
        outcome: AlertStatus,
    ) -> Result<Alert, mailalert_core::error::CoreError> {
        alert.status = alert.status.transition_to(outcome)?;
        alert.sent_at = (outcome == AlertStatus::Sent).then(Utc::now);
        Ok(alert)
    }

    /// Persist the configured consequence of an address fault.
    ///
    /// A failure here is logged only; the caller still receives the fault.
    async fn apply_fault_policy(&self, alert: Alert, fault: &AddressValidationFault) {
        if self.fault_policy == ValidationFaultPolicy::LeavePending {
            return;
        }

        let alert_id = alert.id;
        let updated = match Self::finish(alert, AlertStatus::SendFailed) {
            Ok(failed) => self.store.update(&failed).await.map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        if let Err(error) = updated {
            tracing::error!(
                alert_id,
                %error,
                fault = %fault,
                "Failed to mark alert as SEND_FAILED after address validation fault"
            );
        }
    }
}
