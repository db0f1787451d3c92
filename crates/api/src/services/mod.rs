//! Business-rule layer between handlers and repositories.

pub mod example;

pub use example::ExampleService;

use stencil_core::error::CoreError;

/// Failure of a service operation.
///
/// `Domain` errors are expected outcomes (missing rows, rule violations);
/// `Storage` errors come straight from the repository untouched.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] CoreError),

    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
