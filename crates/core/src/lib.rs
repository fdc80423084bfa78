//! MailAlert core domain logic.
//!
//! Pure, I/O-free building blocks shared by the database, pipeline and API
//! crates:
//!
//! - [`alert`]: alert status state machine and error-timestamp parsing.
//! - [`email_address`]: recipient list parsing and per-address validation.
//! - [`template`]: HTML template selection, payload escaping and rendering.

pub mod alert;
pub mod email_address;
pub mod error;
pub mod template;
pub mod types;
