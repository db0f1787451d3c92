use std::sync::Arc;

use stencil_db::DataSource;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`). Nothing in here is
/// mutated by requests; per-request storage access goes through sessions
/// opened from `data_source`.
#[derive(Clone)]
pub struct AppState {
    /// Opens request-scoped repositories.
    pub data_source: Arc<dyn DataSource>,
}

impl AppState {
    pub fn new(data_source: Arc<dyn DataSource>) -> Self {
        Self { data_source }
    }
}
