use thiserror::Error;

/// Failure talking to the record service.
///
/// These never leave the dashboard: reads degrade to empty data and
/// writes are reconciled by the next refresh.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid server url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}
