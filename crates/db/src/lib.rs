//! PostgreSQL persistence for the barter marketplace.
//!
//! - [`models`] -- row structs, DTOs and response projections.
//! - [`repositories`] -- zero-sized repos with async query methods.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Maximum number of connection attempts made by [`create_pool`].
const CONNECT_ATTEMPTS: u32 = 5;
/// Delay before the second attempt; doubled after each failure.
const INITIAL_RETRY_DELAY: Duration = Duration::from_millis(500);
/// Upper bound on the delay between attempts.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(8);

/// Create a connection pool from a database URL.
///
/// Connection failures are retried with exponential backoff so the server
/// survives a database that is still starting up. Errors other than I/O or
/// pool timeouts are returned immediately.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let mut delay = INITIAL_RETRY_DELAY;
    let mut attempt = 1;

    loop {
        let result = PgPoolOptions::new()
            .max_connections(20)
            .connect(database_url)
            .await;

        match result {
            Ok(pool) => return Ok(pool),
            Err(e) if attempt < CONNECT_ATTEMPTS && is_transient(&e) => {
                tracing::warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Database connection failed, retrying",
                );
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(MAX_RETRY_DELAY);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Whether a connection error is worth retrying.
fn is_transient(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut)
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Version of the most recently applied migration, if any.
pub async fn schema_version(pool: &DbPool) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar("SELECT MAX(version) FROM _sqlx_migrations WHERE success")
        .fetch_one(pool)
        .await
}

/// Apply all embedded migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
