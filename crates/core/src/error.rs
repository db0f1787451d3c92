use crate::types::DbId;

/// Domain-level failures.
///
/// Variants carry only the data needed to describe the failure; mapping to a
/// transport status happens at the HTTP boundary.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
