//! File and directory values surfaced to callers.

use chrono::{DateTime, Utc};

/// A file stored in the zone.
///
/// A plain value derived from one listing or upload; holding one does not
/// pin any adapter state, and a stale `Object` simply describes a state
/// the remote once had.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    pub(crate) remote: String,
    pub(crate) size: Option<u64>,
    pub(crate) mod_time: DateTime<Utc>,
    pub(crate) checksum: Option<String>,
}

impl Object {
    /// Logical path relative to the adapter root.
    #[must_use]
    pub fn remote(&self) -> &str {
        &self.remote
    }

    /// Size in bytes; `None` when the remote has not reported one yet
    /// (freshly uploaded objects — a re-listing learns the real size).
    #[must_use]
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    /// Last modification time reported by the remote.
    #[must_use]
    pub fn mod_time(&self) -> DateTime<Utc> {
        self.mod_time
    }

    /// Lower-case hex SHA-256 of the content, when known.
    #[must_use]
    pub fn checksum(&self) -> Option<&str> {
        self.checksum.as_deref()
    }
}

impl std::fmt::Display for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.remote)
    }
}

/// A subdirectory of the zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    pub(crate) remote: String,
    pub(crate) mod_time: DateTime<Utc>,
}

impl Directory {
    /// Logical path relative to the adapter root.
    #[must_use]
    pub fn remote(&self) -> &str {
        &self.remote
    }

    /// Last modification time reported by the remote.
    #[must_use]
    pub fn mod_time(&self) -> DateTime<Utc> {
        self.mod_time
    }
}

/// One listing entry: a file or a subdirectory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A file object.
    File(Object),
    /// A subdirectory.
    Directory(Directory),
}

impl Entry {
    /// Logical path relative to the adapter root.
    #[must_use]
    pub fn remote(&self) -> &str {
        match self {
            Self::File(object) => object.remote(),
            Self::Directory(dir) => dir.remote(),
        }
    }
}
