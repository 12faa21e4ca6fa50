//! Wire models for storage zone responses.

mod entry;

pub use entry::StorageEntry;
