//! Storage layer for the `examples` table.
//!
//! The repository is the only code that talks SQL. Callers obtain one per
//! request through a [`DataSource`], which binds it to a fresh [`DbSession`].

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;
pub mod session;
pub mod source;

#[cfg(any(test, feature = "test-support"))]
pub mod memory;

pub use session::{DbSession, RetryPolicy};
pub use source::{DataSource, PgDataSource};

pub type DbPool = sqlx::PgPool;

/// Connection pool sizing.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    /// Connections kept open while idle.
    pub pool_size: u32,
    /// Extra connections allowed on top of `pool_size` under load.
    pub max_overflow: u32,
    /// How long an acquire may wait for a free connection.
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            pool_size: 32,
            max_overflow: 64,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

/// Create a connection pool from a database URL.
///
/// Connections are verified before being handed out, so a connection the
/// server dropped while idle is replaced instead of failing the request.
pub async fn create_pool(
    database_url: &str,
    settings: &PoolSettings,
) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .min_connections(settings.pool_size)
        .max_connections(settings.pool_size + settings.max_overflow)
        .acquire_timeout(settings.acquire_timeout)
        .test_before_acquire(true)
        .connect(database_url)
        .await
}

/// Run a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
