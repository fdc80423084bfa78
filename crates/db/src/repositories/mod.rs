//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod alert_repo;
pub mod trace_event_repo;

pub use alert_repo::AlertRepo;
pub use trace_event_repo::TraceEventRepo;
