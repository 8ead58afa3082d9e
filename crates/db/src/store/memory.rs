//! In-memory [`PlacementStore`] implementation.
//!
//! Evaluates predicates in process with the same matching and ordering rules
//! as the Postgres backend. Suitable for tests and local development without
//! a database.

use std::cmp::Ordering;

use async_trait::async_trait;
use placement_core::filter::FilterPredicate;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::placement::{NewPlacement, PlacementRecord, PlacementSummary};
use crate::store::PlacementStore;

/// Placement collection held in a `Vec` behind an async `RwLock`.
#[derive(Debug, Default)]
pub struct MemoryPlacementStore {
    records: RwLock<Vec<PlacementRecord>>,
}

impl MemoryPlacementStore {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given placements.
    pub fn with_placements(placements: &[NewPlacement]) -> Self {
        let records = placements
            .iter()
            .zip(1..)
            .map(|(input, id)| PlacementRecord::from_new(id, input))
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

/// `placement_id` ascending with missing ids last, then `id` ascending.
fn listing_order(a: &PlacementRecord, b: &PlacementRecord) -> Ordering {
    let by_placement = match (a.placement_id, b.placement_id) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_placement.then(a.id.cmp(&b.id))
}

#[async_trait]
impl PlacementStore for MemoryPlacementStore {
    async fn insert(&self, input: &NewPlacement) -> Result<PlacementRecord, StoreError> {
        let mut records = self.records.write().await;
        let next_id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let record = PlacementRecord::from_new(next_id, input);
        records.push(record.clone());
        Ok(record)
    }

    async fn find(
        &self,
        predicate: &FilterPredicate,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<PlacementSummary>, StoreError> {
        let records = self.records.read().await;

        let mut matching: Vec<&PlacementRecord> = records
            .iter()
            .filter(|r| predicate.matches(|field| r.field_ref(field)))
            .collect();
        matching.sort_by(|a, b| listing_order(a, b));

        let skip = usize::try_from(skip).unwrap_or(0);
        let limit = usize::try_from(limit).unwrap_or(0);

        Ok(matching
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(PlacementSummary::from)
            .collect())
    }

    async fn count(&self, predicate: &FilterPredicate) -> Result<i64, StoreError> {
        let records = self.records.read().await;
        let count = records
            .iter()
            .filter(|r| predicate.matches(|field| r.field_ref(field)))
            .count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
