//! Route definitions for placement listing.

use axum::routing::get;
use axum::Router;

use crate::handlers::placements;
use crate::state::AppState;

/// Placement routes mounted at `/placements`.
///
/// ```text
/// GET  /                       -> list_placements
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(placements::list_placements))
}
