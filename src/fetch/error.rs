use crate::types::dataset::DatasetKind;
use thiserror::Error;

/// Failures while talking to the upstream Open-Meteo endpoints.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network request failed for {url}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to decode response body from {url}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Failures while reshaping an upstream response into an observation batch.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Response for {kind} is missing its {expected} block")]
    MissingBlock {
        kind: DatasetKind,
        expected: &'static str,
    },

    #[error(
        "Invalid timeline descriptors: first={first}, last={last}, interval={interval} seconds"
    )]
    BadTimeline { first: i64, last: i64, interval: i64 },

    #[error("Timestamp {0} is out of representable range")]
    TimestampOutOfRange(i64),

    #[error("Requested variable '{name}' is missing from the {kind} response")]
    MissingVariable { kind: DatasetKind, name: String },

    #[error("Variable '{name}' is not a numeric array")]
    InvalidVariable {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Variable '{name}' has {found} values but the timeline has {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
}
