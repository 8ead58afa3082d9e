//! Placement persistence: models, the record store abstraction and its
//! Postgres and in-memory backends.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod models;
pub mod repositories;
pub mod store;

pub use error::StoreError;
pub use store::{MemoryPlacementStore, PgPlacementStore, PlacementStore};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
///
/// `query_timeout` bounds both waiting for a pooled connection and each
/// statement (`statement_timeout` is set on every new connection), so a
/// stalled database surfaces as a [`sqlx::Error`] instead of a hung request.
pub async fn create_pool(
    database_url: &str,
    max_connections: u32,
    query_timeout: Duration,
) -> Result<DbPool, sqlx::Error> {
    let statement_timeout_ms = u64::try_from(query_timeout.as_millis()).unwrap_or(u64::MAX);

    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(query_timeout)
        .after_connect(move |conn, _meta| {
            Box::pin(async move {
                sqlx::query(&format!("SET statement_timeout = {statement_timeout_ms}"))
                    .execute(&mut *conn)
                    .await?;
                Ok(())
            })
        })
        .connect(database_url)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations (table and index provisioning).
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
