//! Outbound mail delivery.
//!
//! The pipeline talks to mail delivery only through [`MailTransport`], so the
//! SMTP implementation in [`email`] can be swapped for a recording double in
//! tests or for [`DisabledTransport`] when SMTP is not configured.

pub mod email;

use async_trait::async_trait;

// ---------------------------------------------------------------------------
// OutboundEmail
// ---------------------------------------------------------------------------

/// A fully addressed HTML email, ready to hand to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    /// Primary recipients; never empty when produced by the dispatcher.
    pub to: Vec<String>,
    /// Carbon-copy recipients; may be empty.
    pub cc: Vec<String>,
    pub from_address: String,
    /// Display name shown next to `from_address`.
    pub from_name: String,
    pub subject: String,
    pub html_body: String,
}

// ---------------------------------------------------------------------------
// TransportError
// ---------------------------------------------------------------------------

/// Error type for mail delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),

    /// No transport has been configured for this deployment.
    #[error("email delivery is not configured")]
    NotConfigured,
}

// ---------------------------------------------------------------------------
// MailTransport
// ---------------------------------------------------------------------------

/// Capability to deliver one email. Implementations own their timeouts.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<(), TransportError>;
}

/// Transport used when SMTP is not configured: every send fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledTransport;

#[async_trait]
impl MailTransport for DisabledTransport {
    async fn send(&self, _email: &OutboundEmail) -> Result<(), TransportError> {
        Err(TransportError::NotConfigured)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
