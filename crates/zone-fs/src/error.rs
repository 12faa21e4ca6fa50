//! Caller-facing error taxonomy.

use http::StatusCode;
use thiserror::Error;

use zone_client::{ApiError, HttpClientError};

/// Errors returned by [`ZoneFs`](crate::ZoneFs) operations.
///
/// Callers match on variants; no failure class requires message
/// inspection. Rate-limit and transient-transport conditions only appear
/// here after the internal retry budget is spent — a retried-then-
/// successful call reports plain success.
#[derive(Debug, Error)]
pub enum Error {
    /// The addressed directory does not exist on the remote.
    #[error("directory not found")]
    DirectoryNotFound,
    /// No object exists at the addressed path.
    #[error("object not found")]
    ObjectNotFound,
    /// A directory occupies the addressed file path.
    #[error("path is a directory")]
    IsDirectory,
    /// The remote answered with a status the operation does not accept.
    #[error("remote rejected the request (status {status})")]
    RemoteRejected {
        /// The status observed on the final attempt.
        status: StatusCode,
    },
    /// Rate limiting persisted past the retry budget.
    #[error("rate limited by the remote")]
    RateLimited,
    /// Transport-level failure, retries exhausted where applicable.
    #[error("transport failure: {0}")]
    Transport(#[source] HttpClientError),
    /// A listing payload could not be decoded.
    #[error("undecodable listing payload: {0}")]
    Decode(#[source] serde_json::Error),
    /// The remote derives modification times from uploads; clients cannot
    /// set them.
    #[error("modification times cannot be set on this remote")]
    ModTimeUnsupported,
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::RateLimited => Self::RateLimited,
            ApiError::Status(status) => Self::RemoteRejected { status },
            ApiError::Http(inner) => Self::Transport(inner),
            ApiError::Decode(inner) => Self::Decode(inner),
        }
    }
}
