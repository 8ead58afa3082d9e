//! Placement listing: page resolution, predicate construction and the paired
//! window/count store queries.

use std::sync::Arc;
use std::time::Duration;

use placement_core::filter::{build_predicate, ParseMode, PlacementFilterParams};
use placement_core::pagination::{PageBounds, PageParams, PageRequest, PageResult};
use placement_db::models::placement::PlacementSummary;
use placement_db::{PlacementStore, StoreError};

use crate::error::AppResult;

/// Coordinates one listing request against the record store.
#[derive(Clone)]
pub struct PlacementService {
    store: Arc<dyn PlacementStore>,
    bounds: PageBounds,
    mode: ParseMode,
    query_timeout: Duration,
}

impl PlacementService {
    pub fn new(
        store: Arc<dyn PlacementStore>,
        bounds: PageBounds,
        mode: ParseMode,
        query_timeout: Duration,
    ) -> Self {
        Self {
            store,
            bounds,
            mode,
            query_timeout,
        }
    }

    /// List one page of placements matching the filter parameters.
    ///
    /// The window fetch and the total count run concurrently; if either fails
    /// or both together outlast the query timeout, the whole request fails and
    /// no partial page is returned.
    pub async fn list(
        &self,
        page: &PageParams,
        filters: &PlacementFilterParams,
    ) -> AppResult<PageResult<PlacementSummary>> {
        let request = PageRequest::resolve(page, &self.bounds, self.mode)?;
        let predicate = build_predicate(filters, self.mode)?;

        let fetch = async {
            tokio::try_join!(
                self.store.find(&predicate, request.skip(), request.limit()),
                self.store.count(&predicate),
            )
        };
        let (items, total) = tokio::time::timeout(self.query_timeout, fetch)
            .await
            .map_err(|_| {
                StoreError::Unavailable(format!(
                    "listing queries exceeded {} ms",
                    self.query_timeout.as_millis()
                ))
            })??;

        tracing::debug!(
            page = request.page(),
            limit = request.limit(),
            constraints = predicate.len(),
            returned = items.len(),
            total,
            "Listed placements"
        );

        Ok(PageResult::new(items, &request, total))
    }
}
