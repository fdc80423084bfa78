//! Pipeline configuration loaded from environment variables.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use mailalert_core::error::CoreError;
use mailalert_core::template::TemplateSet;

/// Sender address when `SMTP_FROM` is not set.
pub const DEFAULT_FROM_ADDRESS: &str = "noreply@mailalert.local";

/// Sender display name when `SMTP_FROM_NAME` is not set.
pub const DEFAULT_FROM_NAME: &str = "Support";

// ---------------------------------------------------------------------------
// ValidationFaultPolicy
// ---------------------------------------------------------------------------

/// What happens to the persisted alert when its addresses are rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationFaultPolicy {
    /// Leave the alert `PENDING`.
    #[default]
    LeavePending,
    /// Move the alert to `SEND_FAILED` before surfacing the fault.
    MarkSendFailed,
}

impl ValidationFaultPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LeavePending => "leave_pending",
            Self::MarkSendFailed => "mark_send_failed",
        }
    }
}

impl fmt::Display for ValidationFaultPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidationFaultPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "leave_pending" => Ok(Self::LeavePending),
            "mark_send_failed" => Ok(Self::MarkSendFailed),
            other => Err(CoreError::Validation(format!(
                "Unknown validation fault policy '{other}', \
                 expected 'leave_pending' or 'mark_send_failed'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// PipelineConfig
// ---------------------------------------------------------------------------

/// Sender identity placed in the `From` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderIdentity {
    pub address: String,
    pub name: String,
}

impl Default for SenderIdentity {
    fn default() -> Self {
        Self {
            address: DEFAULT_FROM_ADDRESS.to_string(),
            name: DEFAULT_FROM_NAME.to_string(),
        }
    }
}

/// Orchestrator and dispatcher settings.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub fault_policy: ValidationFaultPolicy,
    /// Directory overriding the embedded templates.
    pub template_dir: Option<PathBuf>,
    pub sender: SenderIdentity,
}

impl PipelineConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable                  | Default                   |
    /// |---------------------------|---------------------------|
    /// | `VALIDATION_FAULT_POLICY` | `leave_pending`           |
    /// | `TEMPLATE_DIR`            | embedded templates        |
    /// | `SMTP_FROM`               | `noreply@mailalert.local` |
    /// | `SMTP_FROM_NAME`          | `Support`                 |
    pub fn from_env() -> Result<Self, CoreError> {
        let fault_policy = match std::env::var("VALIDATION_FAULT_POLICY") {
            Ok(raw) => raw.parse()?,
            Err(_) => ValidationFaultPolicy::default(),
        };

        let defaults = SenderIdentity::default();
        Ok(Self {
            fault_policy,
            template_dir: std::env::var("TEMPLATE_DIR").ok().map(PathBuf::from),
            sender: SenderIdentity {
                address: std::env::var("SMTP_FROM").unwrap_or(defaults.address),
                name: std::env::var("SMTP_FROM_NAME").unwrap_or(defaults.name),
            },
        })
    }

    /// Templates to render with: the override directory if set, else the
    /// embedded pair.
    pub fn load_templates(&self) -> Result<TemplateSet, CoreError> {
        match &self.template_dir {
            Some(dir) => TemplateSet::from_dir(dir),
            None => TemplateSet::embedded(),
        }
    }
}
