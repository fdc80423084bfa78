//! Inbound alert request.

use mailalert_core::alert::MAX_CREATED_BY_LENGTH;
use serde::Deserialize;
use validator::{Validate, ValidationError};

/// A request to record and notify one alert.
///
/// `to` and `cc` are delimited address lists (`,` or `;`). Structural
/// address checks happen in the dispatcher; [`Validate`] only rejects blank
/// fields and an over-long `created_by`. Missing strings deserialize as empty
/// so they are reported per field like blank ones.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AlertRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "recipients are required"))]
    pub to: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "cc is required"))]
    pub cc: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "subject is required"))]
    pub subject: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "source file name is required"))]
    pub source_file_name: String,
    /// Empty means the exchange succeeded.
    #[serde(default)]
    pub error_type: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "affected channel is required"))]
    pub affected_channel: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "payload is required"))]
    pub payload: String,
    /// RFC 3339 or `dd/mm/yyyy HH:mm:ss`; defaults to the creation time.
    #[serde(default)]
    pub error_timestamp: Option<String>,
    #[serde(default)]
    #[validate(length(max = MAX_CREATED_BY_LENGTH, message = "created_by is too long"))]
    pub created_by: Option<String>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
