//! Postgres-backed [`PlacementStore`] built on [`PlacementRepo`].

use std::time::Duration;

use async_trait::async_trait;
use placement_core::filter::FilterPredicate;

use crate::error::StoreError;
use crate::models::placement::{NewPlacement, PlacementRecord, PlacementSummary};
use crate::repositories::PlacementRepo;
use crate::store::PlacementStore;
use crate::DbPool;

/// [`PlacementStore`] over a shared sqlx connection pool.
#[derive(Debug, Clone)]
pub struct PgPlacementStore {
    pool: DbPool,
}

impl PgPlacementStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Connect, verify connectivity and apply migrations.
    ///
    /// Every query is bounded by `query_timeout`; see [`crate::create_pool`].
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        query_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = crate::create_pool(database_url, max_connections, query_timeout).await?;
        tracing::info!(
            max_connections,
            query_timeout_ms = query_timeout.as_millis() as u64,
            "Database connection pool created"
        );

        crate::health_check(&pool).await?;
        tracing::info!("Database health check passed");

        crate::run_migrations(&pool)
            .await
            .map_err(|e| StoreError::Unavailable(format!("migrations failed: {e}")))?;
        tracing::info!("Database migrations applied");

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl PlacementStore for PgPlacementStore {
    async fn insert(&self, input: &NewPlacement) -> Result<PlacementRecord, StoreError> {
        Ok(PlacementRepo::create(&self.pool, input).await?)
    }

    async fn find(
        &self,
        predicate: &FilterPredicate,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<PlacementSummary>, StoreError> {
        Ok(PlacementRepo::list(&self.pool, predicate, skip, limit).await?)
    }

    async fn count(&self, predicate: &FilterPredicate) -> Result<i64, StoreError> {
        Ok(PlacementRepo::count(&self.pool, predicate).await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        if self.pool.is_closed() {
            return Err(StoreError::Unavailable("connection pool is closed".into()));
        }
        crate::health_check(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database connection pool closed");
    }
}
