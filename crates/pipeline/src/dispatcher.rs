//! Validates recipients, renders the notification and hands it to the
//! transport.

use std::sync::Arc;

use mailalert_core::email_address::{
    all_valid, filter_valid_addresses, parse_address_list, AddressValidationFault,
};
use mailalert_db::models::alert::Alert;
use mailalert_events::{MailTransport, OutboundEmail, TraceBus, TraceKind};

use crate::config::SenderIdentity;
use crate::render::ContentRenderer;
use crate::request::AlertRequest;

/// Message of the fault raised when any CC address is rejected.
pub const CC_FAULT_MESSAGE: &str = "invalid addresses in CC field";

/// Sends one notification per alert.
pub struct NotificationDispatcher {
    transport: Arc<dyn MailTransport>,
    renderer: ContentRenderer,
    sender: SenderIdentity,
    trace: Arc<TraceBus>,
}

impl NotificationDispatcher {
    pub fn new(
        transport: Arc<dyn MailTransport>,
        renderer: ContentRenderer,
        sender: SenderIdentity,
        trace: Arc<TraceBus>,
    ) -> Self {
        Self {
            transport,
            renderer,
            sender,
            trace,
        }
    }

    /// Attempt delivery of the notification for `alert`.
    ///
    /// Returns `Ok(true)` once the transport accepted the message and
    /// `Ok(false)` when it was not sent. Rejected addresses are the only
    /// error; the transport is never called in that case.
    pub async fn dispatch(
        &self,
        request: &AlertRequest,
        alert: &Alert,
        correlation_id: &str,
    ) -> Result<bool, AddressValidationFault> {
        let to_results = parse_address_list(&request.to);
        if !all_valid(&to_results) {
            return Err(AddressValidationFault::new(to_results));
        }

        let has_cc = !request.cc.trim().is_empty();
        if has_cc {
            let cc_results = parse_address_list(&request.cc);
            if !all_valid(&cc_results) {
                return Err(AddressValidationFault::with_message(CC_FAULT_MESSAGE, cc_results));
            }
        }

        let to = filter_valid_addresses(&request.to);
        if to.is_empty() {
            self.trace.record(
                TraceKind::ProcessWarn,
                correlation_id,
                format!("no valid recipients for alert {}, email not sent", alert.id),
            );
            return Ok(false);
        }
        let cc = if has_cc {
            filter_valid_addresses(&request.cc)
        } else {
            Vec::new()
        };

        let html_body = match self.renderer.render(alert) {
            Ok(html) => html,
            Err(e) => {
                self.trace.record(
                    TraceKind::ProcessWarn,
                    correlation_id,
                    format!("rendering failed for alert {}: {e}", alert.id),
                );
                return Ok(false);
            }
        };

        let email = OutboundEmail {
            to,
            cc,
            from_address: self.sender.address.clone(),
            from_name: self.sender.name.clone(),
            subject: format!("{} - {}", request.subject, alert.error_type),
            html_body,
        };

        tracing::debug!(
            alert_id = alert.id,
            correlation_id,
            recipients = email.to.len() + email.cc.len(),
            "Sending alert notification"
        );

        match self.transport.send(&email).await {
            Ok(()) => Ok(true),
            Err(e) => {
                self.trace.record(
                    TraceKind::ProcessWarn,
                    correlation_id,
                    format!("email delivery failed for alert {}: {e}", alert.id),
                );
                Ok(false)
            }
        }
    }
}
