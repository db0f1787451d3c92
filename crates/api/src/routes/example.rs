//! Route definitions for the `/examples` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::example;
use crate::state::AppState;

/// Routes for examples, mounted under `/api/v1`.
///
/// The collection answers with and without a trailing slash.
///
/// ```text
/// GET    /examples          -> list
/// POST   /examples          -> create
/// GET    /examples/{id}     -> get_by_id
/// PUT    /examples/{id}     -> update
/// DELETE /examples/{id}     -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/examples", get(example::list).post(example::create))
        .route("/examples/", get(example::list).post(example::create))
        .route(
            "/examples/{id}",
            get(example::get_by_id)
                .put(example::update)
                .delete(example::delete),
        )
}
