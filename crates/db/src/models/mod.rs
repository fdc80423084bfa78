//! Row models and create DTOs.

pub mod alert;
pub mod trace_event;
