use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use placement_core::error::CoreError;
use placement_db::StoreError;
use serde_json::json;

/// Message returned for any record store failure. Store details stay in the log.
pub const FETCH_FAILED_MESSAGE: &str = "An error occurred while fetching placements";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors, [`StoreError`] for record store
/// failures, and adds HTTP-specific variants. Implements [`IntoResponse`] to
/// produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `placement_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The record store failed to answer a query.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Store(err) => {
                tracing::error!(error = %err, "Placement store query failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORE_UNAVAILABLE",
                    FETCH_FAILED_MESSAGE.to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
