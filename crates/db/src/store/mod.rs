//! Record store abstraction consumed by the listing service.
//!
//! Defines [`PlacementStore`], the read/insert capability over a placement
//! collection. Handlers hold it as `Arc<dyn PlacementStore>` so the backend
//! (Postgres in production, in-memory for tests and local runs) is chosen
//! once at startup.

use async_trait::async_trait;
use placement_core::filter::FilterPredicate;

use crate::error::StoreError;
use crate::models::placement::{NewPlacement, PlacementRecord, PlacementSummary};

mod memory;
mod postgres;

pub use memory::MemoryPlacementStore;
pub use postgres::PgPlacementStore;

/// Queryable placement collection.
///
/// `find` and `count` must agree: for any predicate, `count` equals the
/// number of records `find` would return with no window applied. `find`
/// returns records ordered by `placement_id` ascending (missing ids last),
/// then by surrogate `id`.
#[async_trait]
pub trait PlacementStore: Send + Sync {
    /// Insert a placement and return the stored record.
    async fn insert(&self, input: &NewPlacement) -> Result<PlacementRecord, StoreError>;

    /// Fetch the window of matching records starting after `skip` matches,
    /// holding at most `limit` records, projected to their listing fields.
    async fn find(
        &self,
        predicate: &FilterPredicate,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<PlacementSummary>, StoreError>;

    /// Count every record matching the predicate.
    async fn count(&self, predicate: &FilterPredicate) -> Result<i64, StoreError>;

    /// Check that the backend can serve queries.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Release backend resources. Called once during shutdown.
    async fn close(&self) {}
}
