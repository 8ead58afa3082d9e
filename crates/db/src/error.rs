/// Failure reported by a [`PlacementStore`](crate::PlacementStore) backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A query or connection error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The backend cannot serve requests (e.g. the pool was closed).
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
