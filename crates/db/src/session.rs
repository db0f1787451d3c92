//! Request-scoped database sessions.
//!
//! A [`DbSession`] owns one pooled connection for the lifetime of a request.
//! The connection goes back to the pool when the session is closed or
//! dropped, so it is released on every exit path including errors and
//! panics. Transactions opened with [`DbSession::begin`] roll back unless
//! committed.

use std::time::{Duration, Instant};

use sqlx::pool::PoolConnection;
use sqlx::{PgConnection, Postgres, Transaction};

use crate::DbPool;

/// How often and how patiently to retry acquiring a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Values below 1 are treated as 1.
    pub attempts: u32,
    /// Fixed delay between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

/// Whether `err` is a connectivity failure worth retrying.
///
/// Query and constraint errors are never transient.
pub fn is_transient(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
    )
}

/// A pooled connection held for the duration of one request.
pub struct DbSession {
    conn: PoolConnection<Postgres>,
    acquired_at: Instant,
}

impl DbSession {
    /// Acquire a session, retrying transient connectivity failures.
    ///
    /// Gives up after `policy.attempts` tries and returns the last error.
    pub async fn acquire(pool: &DbPool, policy: &RetryPolicy) -> Result<Self, sqlx::Error> {
        let attempts = policy.attempts.max(1);
        let mut attempt = 1;
        loop {
            match pool.acquire().await {
                Ok(conn) => {
                    tracing::trace!(attempt, "Database session acquired");
                    return Ok(Self {
                        conn,
                        acquired_at: Instant::now(),
                    });
                }
                Err(err) if attempt < attempts && is_transient(&err) => {
                    tracing::warn!(
                        attempt,
                        max_attempts = attempts,
                        error = %err,
                        "Transient error acquiring database session, retrying",
                    );
                    tokio::time::sleep(policy.delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    tracing::error!(attempt, error = %err, "Failed to acquire database session");
                    return Err(err);
                }
            }
        }
    }

    /// Open a transaction on this session.
    ///
    /// Call `commit()` on the returned handle to keep the changes. Dropping
    /// it without committing rolls back.
    pub async fn begin(&mut self) -> Result<Transaction<'_, Postgres>, sqlx::Error> {
        sqlx::Connection::begin(&mut *self.conn).await
    }

    /// The underlying connection, for reads outside a transaction.
    pub fn connection(&mut self) -> &mut PgConnection {
        &mut self.conn
    }

    /// Release the session back to the pool.
    pub fn close(self) {
        drop(self);
    }
}

impl Drop for DbSession {
    fn drop(&mut self) {
        tracing::trace!(
            held_ms = self.acquired_at.elapsed().as_millis() as u64,
            "Database session released",
        );
    }
}
