//! Tests for `AppError` → HTTP response mapping.
//!
//! These tests verify that each `AppError` variant produces the correct HTTP
//! status code, error code, and message. They do NOT need an HTTP server --
//! they call `IntoResponse` directly on `AppError` values.

use axum::response::IntoResponse;
use http_body_util::BodyExt;
use placement_api::error::{AppError, FETCH_FAILED_MESSAGE};
use placement_core::error::CoreError;
use placement_db::StoreError;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (axum::http::StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// Test: CoreError::Validation maps to 400 with VALIDATION_ERROR code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("site_id must be an integer".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "site_id must be an integer");
}

// ---------------------------------------------------------------------------
// Test: AppError::BadRequest maps to 400 with BAD_REQUEST code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bad_request_error_returns_400() {
    let err = AppError::BadRequest("invalid field value".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "invalid field value");
}

// ---------------------------------------------------------------------------
// Test: StoreError maps to 500 and sanitizes the message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn store_error_returns_500_and_sanitizes_message() {
    let err = AppError::from(StoreError::Unavailable(
        "connection to postgres://admin:hunter2@db refused".into(),
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "STORE_UNAVAILABLE");
    assert_eq!(json["error"], FETCH_FAILED_MESSAGE);
    assert!(!json.to_string().contains("hunter2"));
}
