//! Route definitions for the `/alerts` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::alert;
use crate::state::AppState;

/// Routes mounted at `/alerts`.
///
/// ```text
/// POST   /        -> create_alert
/// GET    /{id}    -> get_alert
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(alert::create_alert))
        .route("/{id}", get(alert::get_alert))
}
