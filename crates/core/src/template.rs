//! HTML notification templates.
//!
//! Two templates exist: one for error alerts and one for successful
//! exchanges. Which one is used depends only on whether the alert carries an
//! error type. Templates are handlebars sources rendered from a
//! [`RenderContext`] in strict mode. Handlebars HTML-escapes every value
//! except the payload, which is escaped once, up front, by
//! [`escape_payload`] and inserted with `{{{payload}}}`.

use std::path::Path;

use handlebars::Handlebars;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Display format for the alert timestamp (`dd/mm/yyyy HH:mm:ss`).
pub const DISPLAY_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Rendered in place of a blank payload.
pub const PAYLOAD_PLACEHOLDER: &str = "not available";

const EMBEDDED_ALERT: &str = include_str!("../templates/alert-email.html");
const EMBEDDED_SUCCESS: &str = include_str!("../templates/success-email.html");

const KINDS: [TemplateKind; 2] = [TemplateKind::Alert, TemplateKind::Success];

// ---------------------------------------------------------------------------
// TemplateKind
// ---------------------------------------------------------------------------

/// Which notification template to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Alert,
    Success,
}

impl TemplateKind {
    /// An empty error type means the exchange succeeded.
    pub fn for_error_type(error_type: &str) -> Self {
        if error_type.is_empty() {
            Self::Success
        } else {
            Self::Alert
        }
    }

    /// Name the template is registered under.
    pub fn name(self) -> &'static str {
        match self {
            Self::Alert => "alert-email",
            Self::Success => "success-email",
        }
    }

    /// Template file name, used for directory overrides and diagnostics.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Alert => "alert-email.html",
            Self::Success => "success-email.html",
        }
    }
}

// ---------------------------------------------------------------------------
// RenderContext
// ---------------------------------------------------------------------------

/// Variables available to a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderContext {
    pub alert_id: DbId,
    pub file_name: String,
    pub error_type: String,
    /// Already formatted with [`DISPLAY_TIMESTAMP_FORMAT`].
    pub timestamp: String,
    pub affected_channel: String,
    /// Already escaped with [`escape_payload`].
    pub payload: String,
}

impl RenderContext {
    pub fn new(
        alert_id: DbId,
        file_name: &str,
        error_type: &str,
        timestamp: Timestamp,
        affected_channel: &str,
        payload: &str,
    ) -> Self {
        Self {
            alert_id,
            file_name: file_name.to_string(),
            error_type: error_type.to_string(),
            timestamp: format_timestamp(timestamp),
            affected_channel: affected_channel.to_string(),
            payload: escape_payload(payload),
        }
    }
}

/// Format a timestamp for display in a notification.
pub fn format_timestamp(ts: Timestamp) -> String {
    ts.format(DISPLAY_TIMESTAMP_FORMAT).to_string()
}

/// Escape a raw payload (typically an XML trace) for display inside HTML.
///
/// `&` is replaced first so the entities produced for `<` and `>` are not
/// escaped a second time. A blank payload becomes [`PAYLOAD_PLACEHOLDER`].
pub fn escape_payload(payload: &str) -> String {
    if payload.trim().is_empty() {
        return PAYLOAD_PLACEHOLDER.to_string();
    }
    payload
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

// ---------------------------------------------------------------------------
// TemplateSet
// ---------------------------------------------------------------------------

/// The pair of HTML templates used for notifications, registered with a
/// strict handlebars registry.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    registry: Handlebars<'static>,
}

impl TemplateSet {
    /// Templates compiled into the binary.
    pub fn embedded() -> Result<Self, CoreError> {
        Self::from_sources(EMBEDDED_ALERT, EMBEDDED_SUCCESS)
    }

    /// Load both templates from `dir`, using [`TemplateKind::file_name`].
    pub fn from_dir(dir: &Path) -> Result<Self, CoreError> {
        let load = |kind: TemplateKind| {
            let path = dir.join(kind.file_name());
            std::fs::read_to_string(&path).map_err(|e| {
                CoreError::Template(format!("cannot read template {}: {e}", path.display()))
            })
        };
        Self::from_sources(&load(TemplateKind::Alert)?, &load(TemplateKind::Success)?)
    }

    /// Register both sources and render each once against a sample context,
    /// so a syntax error or an unknown variable fails here rather than on the
    /// first alert.
    pub fn from_sources(alert: &str, success: &str) -> Result<Self, CoreError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        for (kind, source) in KINDS.into_iter().zip([alert, success]) {
            registry
                .register_template_string(kind.name(), source)
                .map_err(|e| {
                    CoreError::Template(format!("invalid template {}: {e}", kind.file_name()))
                })?;
        }

        let set = Self { registry };
        let sample =
            RenderContext::new(0, "sample.xml", "SAMPLE", Timestamp::UNIX_EPOCH, "-", "-");
        for kind in KINDS {
            set.render(kind, &sample)?;
        }
        Ok(set)
    }

    /// Render the template for `kind` with the given context.
    pub fn render(&self, kind: TemplateKind, ctx: &RenderContext) -> Result<String, CoreError> {
        self.registry.render(kind.name(), ctx).map_err(|e| {
            CoreError::Template(format!("cannot render {}: {e}", kind.file_name()))
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
