pub mod health;
pub mod placements;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /placements                                      list (paginated, filtered)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/placements", placements::router())
}
