use crate::fetch::error::{FetchError, NormalizeError};
use crate::store::error::StoreError;
use thiserror::Error;

/// Top-level error for one fetch-then-store cycle.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] config::ConfigError),
}
