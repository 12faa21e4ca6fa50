//! Hierarchical filesystem access to flat HTTP storage zones.
//!
//! A zone stores objects under flat slash-separated keys. [`ZoneFs`]
//! presents that namespace as listable directories with file objects,
//! upload/download/delete, and directory creation/removal, keeping a
//! per-instance cache of directory listings that is invalidated whenever
//! this adapter mutates the directory in question.

mod cache;
mod entry;
pub mod error;
mod fs;

pub use entry::{Directory, Entry, Object};
pub use error::Error;
pub use fs::{ChecksumAlgorithm, Options, ZoneFs};
pub use zone_client::{
    BodyStream, ByteRange, ConfigError, DownloadOptions, HttpClient, PacerConfig,
    StreamingResponse, ZoneClient, ZoneClientBuilder,
};
