//! Shared error types for the services crate.

use std::time::Duration;

use thiserror::Error;

use storage::sqlite::SqliteInitError;

/// Errors from a motivation source. `MotivationFetcher` turns all of them into
/// the fallback pair.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MotivationError {
    #[error("motivation endpoint is not configured")]
    Disabled,
    #[error("motivation endpoint returned an empty response")]
    EmptyResponse,
    #[error("motivation request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("motivation response is not the expected JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("motivation request timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
