//! Typed client for flat HTTP storage zones.
//!
//! A storage zone is a flat, key-addressed object namespace reached over
//! HTTPS. This crate provides the wire-level pieces: a pluggable HTTP
//! backend abstraction, a retry pacer that absorbs rate limiting, path
//! escaping, the raw listing record model, and [`ZoneClient`] with the
//! zone operations themselves. The hierarchical filesystem view on top
//! lives in the `zone-fs` crate.

pub mod backends;
mod client;
pub mod error;
mod http_client;
pub mod models;
pub mod pacer;
pub mod path;

#[cfg(feature = "reqwest-client")]
pub use backends::ReqwestClient;
#[cfg(feature = "ureq-client")]
pub use backends::UreqClient;
pub use client::{ByteRange, DownloadOptions, ZoneClient, ZoneClientBuilder};
pub use error::{ApiError, ConfigError, HttpClientError};
pub use http_client::{BodyStream, HttpClient, HttpRequest, HttpResponse, StreamingResponse};
pub use pacer::{AttemptOutcome, Pacer, PacerConfig};
