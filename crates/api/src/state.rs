use std::sync::Arc;

use placement_db::PlacementStore;

use crate::config::ServerConfig;
use crate::service::PlacementService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Placement record store shared by all requests.
    pub store: Arc<dyn PlacementStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Listing service bound to `store` and the configured page bounds.
    pub placements: PlacementService,
}

impl AppState {
    pub fn new(store: Arc<dyn PlacementStore>, config: ServerConfig) -> Self {
        let placements = PlacementService::new(
            Arc::clone(&store),
            config.page_bounds(),
            config.parse_mode(),
            config.store_timeout(),
        );
        Self {
            store,
            config: Arc::new(config),
            placements,
        }
    }
}
