pub mod example;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /examples                 list, create
/// /examples/{id}            get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(example::router())
}
