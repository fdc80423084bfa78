//! Shared response envelope types for API handlers.
//!
//! Reads use a `{ "data": ... }` envelope. Pipeline results add a
//! human-readable outcome: `{ "message": ..., "data": ... }`.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "message": String, "data": T }` envelope for command results.
#[derive(Debug, Serialize)]
pub struct MessageResponse<T: Serialize> {
    pub message: String,
    pub data: T,
}
