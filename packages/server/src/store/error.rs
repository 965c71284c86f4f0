use sea_orm::DbErr;
use thiserror::Error;

/// A storage operation could not complete. Nothing was partially applied.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// The backend refused the request (e.g. a dataset too large to store).
    #[error("Storage rejected request: {0}")]
    Rejected(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
