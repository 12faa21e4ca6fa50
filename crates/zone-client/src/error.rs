//! Error types for the storage zone client.

use http::StatusCode;
use thiserror::Error;

/// Errors produced by an [`HttpClient`](crate::HttpClient) backend.
#[derive(Debug, Error)]
pub enum HttpClientError {
    /// The request timed out.
    #[error("request timed out")]
    Timeout,
    /// A connection-level failure (resolution, refusal, reset).
    #[error("connection failed: {0}")]
    Connection(String),
    /// Any other backend failure.
    #[error("http client error: {0}")]
    Other(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl HttpClientError {
    /// Whether this failure class is worth retrying.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout | Self::Connection(_))
    }
}

/// Errors surfaced by [`ZoneClient`](crate::ZoneClient) operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The zone kept answering 429 until the retry budget ran out.
    #[error("rate limited by the storage endpoint")]
    RateLimited,
    /// The zone answered with a status the operation does not accept.
    #[error("unexpected status {0}")]
    Status(StatusCode),
    /// Transport-level failure, retries exhausted where applicable.
    #[error(transparent)]
    Http(#[from] HttpClientError),
    /// The listing payload could not be decoded.
    #[error("failed to decode listing payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors detected while constructing a [`ZoneClient`](crate::ZoneClient).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No storage zone name was provided.
    #[error("storage zone not set")]
    MissingStorageZone,
    /// No access key was provided.
    #[error("access key not set")]
    MissingAccessKey,
    /// The access key contains bytes that cannot travel in a header.
    #[error("access key is not a valid header value")]
    InvalidAccessKey,
}
