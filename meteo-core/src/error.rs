//! Error taxonomy of the acquisition pipeline.
//!
//! Only the primary weather fetch is allowed to abort an acquisition.
//! Country resolution falls back to the local name table and storage
//! failures are logged and swallowed by the service layer.

use thiserror::Error;

/// Failure of the weather provider call. Always fatal for the operation.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("weather request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("weather request failed with status {status}: {body}")]
    Status { status: reqwest::StatusCode, body: String },

    #[error("failed to parse weather response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure of the country-name service call. Never surfaced to callers of
/// the service; it only triggers the local fallback.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("country request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("country request failed with status {status}: {body}")]
    Status { status: reqwest::StatusCode, body: String },

    #[error("failed to parse country response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure of the observation store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("invalid stored timestamp '{0}'")]
    InvalidTimestamp(String),
}

/// Failure of a public acquisition operation.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The station is not stored, or is stored without coordinates.
    #[error("no station named '{0}' with coordinates is stored")]
    UnknownStation(String),

    #[error("this operation requires a configured observation store")]
    StoreRequired,

    /// The station lookup itself failed; distinct from the station being
    /// absent.
    #[error("station lookup failed: {0}")]
    Store(#[from] StoreError),
}
