//! Alert lifecycle status and error-timestamp parsing.
//!
//! An alert starts [`AlertStatus::Pending`] and moves exactly once to one of
//! the terminal states. The transition table lives here so both the pipeline
//! and the repository layer enforce the same rules.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of the `created_by` identity column.
pub const MAX_CREATED_BY_LENGTH: u64 = 50;

/// Day-first format accepted for caller-supplied error timestamps.
pub const DAY_FIRST_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

// ---------------------------------------------------------------------------
// AlertStatus
// ---------------------------------------------------------------------------

/// Delivery status of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertStatus {
    /// Persisted, notification not yet attempted or not yet reconciled.
    Pending,
    /// Notification email accepted by the transport.
    Sent,
    /// Transport reported a failure; terminal.
    SendFailed,
}

impl AlertStatus {
    /// Database / wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Sent => "SENT",
            Self::SendFailed => "SEND_FAILED",
        }
    }

    /// Whether no further transition is allowed from this status.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Sent | Self::SendFailed)
    }

    /// Only `Pending -> Sent` and `Pending -> SendFailed` are legal.
    pub fn can_transition_to(self, next: AlertStatus) -> bool {
        self == Self::Pending && next.is_terminal()
    }

    /// Validate a transition, returning the new status on success.
    pub fn transition_to(self, next: AlertStatus) -> Result<AlertStatus, CoreError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::InvalidTransition(format!(
                "alert status cannot change from {self} to {next}"
            )))
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "SENT" => Ok(Self::Sent),
            "SEND_FAILED" => Ok(Self::SendFailed),
            other => Err(CoreError::Validation(format!(
                "Unknown alert status '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for AlertStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Error timestamp
// ---------------------------------------------------------------------------

/// Resolve the error timestamp of a new alert.
///
/// A blank or absent value falls back to `created_at`. Otherwise the value
/// must be RFC 3339 or `dd/mm/yyyy HH:mm:ss` (read as UTC); anything else is
/// rejected rather than silently replaced.
pub fn resolve_error_timestamp(
    raw: Option<&str>,
    created_at: Timestamp,
) -> Result<Timestamp, CoreError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(created_at);
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, DAY_FIRST_TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| CoreError::Validation(format!("Unparseable error timestamp '{raw}': {e}")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
