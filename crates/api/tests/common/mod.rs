#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use placement_api::config::{ServerConfig, StoreBackend};
use placement_api::router::build_app_router;
use placement_api::state::AppState;
use placement_db::models::placement::NewPlacement;
use placement_db::{MemoryPlacementStore, PlacementStore};
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a 30-second request timeout and the in-memory store backend.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        store_timeout_ms: 10_000,
        shutdown_timeout_secs: 30,
        default_page_limit: 20,
        max_page_limit: 500,
        strict_query_params: false,
        store_backend: StoreBackend::Memory,
        database_url: None,
        db_max_connections: 1,
    }
}

/// Build the full application router (same middleware stack as `main.rs`)
/// over the given store.
pub fn build_test_app(store: Arc<dyn PlacementStore>) -> Router {
    build_test_app_with_config(store, test_config())
}

pub fn build_test_app_with_config(store: Arc<dyn PlacementStore>, config: ServerConfig) -> Router {
    build_app_router(AppState::new(store, config))
}

/// Shorthand for a placement fixture with the commonly filtered fields set.
pub fn placement(
    placement_id: i64,
    site_id: i64,
    placement_type: &str,
    primary_size: &str,
) -> NewPlacement {
    NewPlacement {
        placement_id: Some(placement_id),
        placement_name: Some(format!("Placement {placement_id}")),
        site_id: Some(site_id),
        publisher_id: Some(100 + site_id),
        status_id: Some(1),
        placement_type: Some(placement_type.to_string()),
        primary_size: Some(primary_size.to_string()),
        ..Default::default()
    }
}

/// In-memory store seeded with the given fixtures.
pub fn seeded_store(placements: &[NewPlacement]) -> Arc<dyn PlacementStore> {
    Arc::new(MemoryPlacementStore::with_placements(placements))
}

/// Send a GET request through the router.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
