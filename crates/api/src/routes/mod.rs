pub mod alert;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /alerts                 run the alert pipeline (POST)
/// /alerts/{id}            fetch one alert (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/alerts", alert::router())
}
