//! Handlers for the placement listing endpoint.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use placement_core::pagination::PageResult;
use placement_db::models::placement::PlacementSummary;

use crate::error::{AppError, AppResult};
use crate::query::ListingQuery;
use crate::state::AppState;

/// GET /placements?page=&limit=&site_id=1,2&placement_type=banner
///
/// List placements with pagination and multi-value filters. Integer filters
/// match exactly; text filters match case-insensitive substrings. Unknown
/// query parameters are ignored.
pub async fn list_placements(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> AppResult<Json<PageResult<PlacementSummary>>> {
    let Query(pairs) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let query = ListingQuery::from_pairs(pairs, state.config.parse_mode())?;

    let result = state.placements.list(&query.page, &query.filters).await?;
    Ok(Json(result))
}
