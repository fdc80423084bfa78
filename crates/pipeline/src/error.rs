use mailalert_core::email_address::AddressValidationFault;

/// Generic message attached to every processing fault.
pub const PROCESSING_FAULT_MESSAGE: &str = "internal error while processing the alert";

/// Boxed underlying cause of a processing fault.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure of a single pipeline invocation.
///
/// Delivery failures are not errors: they end the alert in `SEND_FAILED` and
/// come back as a successful [`ProcessedAlert`](crate::ProcessedAlert).
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// One or more `to`/`cc` addresses were rejected. Nothing was sent.
    #[error(transparent)]
    AddressValidation(#[from] AddressValidationFault),

    /// Anything else: timestamp parsing, store failures, bad transitions.
    #[error("{message}")]
    Processing {
        message: String,
        #[source]
        source: BoxError,
    },
}

impl PipelineError {
    /// Wrap an unexpected failure, keeping it as the source.
    pub fn processing(source: impl Into<BoxError>) -> Self {
        Self::Processing {
            message: PROCESSING_FAULT_MESSAGE.to_string(),
            source: source.into(),
        }
    }
}
