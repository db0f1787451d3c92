//! Per-request access to storage.

use async_trait::async_trait;

use crate::repositories::{ExampleRepository, PgExampleRepo};
use crate::session::{DbSession, RetryPolicy};
use crate::DbPool;

/// Hands out repositories bound to a fresh session.
///
/// Held in application state; each request opens its own repository and
/// drops it (releasing the session) when the request ends.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Open an example repository on a new session.
    async fn examples(&self) -> Result<Box<dyn ExampleRepository>, sqlx::Error>;

    /// Check that storage is reachable.
    async fn ping(&self) -> Result<(), sqlx::Error>;
}

/// [`DataSource`] backed by a Postgres connection pool.
#[derive(Debug, Clone)]
pub struct PgDataSource {
    pool: DbPool,
    retry: RetryPolicy,
}

impl PgDataSource {
    pub fn new(pool: DbPool, retry: RetryPolicy) -> Self {
        Self { pool, retry }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl DataSource for PgDataSource {
    async fn examples(&self) -> Result<Box<dyn ExampleRepository>, sqlx::Error> {
        let session = DbSession::acquire(&self.pool, &self.retry).await?;
        Ok(Box::new(PgExampleRepo::new(session)))
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        crate::health_check(&self.pool).await
    }
}
