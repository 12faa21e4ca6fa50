//! Directory listing records.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

/// Timestamp layout used by the zone: no zone designator, optional
/// fractional seconds (`2017-03-10T03:06:48.203`).
const LAST_CHANGED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// One entry of a directory listing — a file or a subdirectory.
///
/// The zone reports both through the same record shape; `is_directory`
/// discriminates. `checksum` only carries meaning for files.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct StorageEntry {
    /// Unique identifier of the stored object.
    pub guid: String,
    /// Name of the storage zone holding the object.
    pub storage_zone_name: String,
    /// Directory path of the object within the zone.
    pub path: String,
    /// File or directory name.
    pub object_name: String,
    /// Size in bytes (zero for directories).
    pub length: u64,
    /// Raw upload timestamp; see [`StorageEntry::mod_time`].
    pub last_changed: String,
    pub server_id: i64,
    pub array_number: i64,
    /// Whether this entry describes a subdirectory.
    pub is_directory: bool,
    /// UUID of the uploading user.
    pub user_id: String,
    /// MIME type reported by the zone.
    pub content_type: String,
    /// First-upload timestamp.
    pub date_created: String,
    /// Numeric identifier of the storage zone.
    pub storage_zone_id: i64,
    /// Hex SHA-256 of the content; absent for directories.
    pub checksum: Option<String>,
    /// Zones the object is replicated to.
    pub replicated_zones: Option<String>,
}

impl StorageEntry {
    /// Parsed modification time.
    ///
    /// Listings must survive malformed timestamps, so a parse failure maps
    /// to the epoch instead of failing the whole directory.
    #[must_use]
    pub fn mod_time(&self) -> DateTime<Utc> {
        NaiveDateTime::parse_from_str(&self.last_changed, LAST_CHANGED_FORMAT)
            .map(|naive| naive.and_utc())
            .unwrap_or(DateTime::UNIX_EPOCH)
    }

    /// Full logical path of this entry given the directory it was listed
    /// in (empty directory means the entry sits at the root).
    #[must_use]
    pub fn full_path(&self, dir: &str) -> String {
        if dir.is_empty() {
            self.object_name.clone()
        } else {
            format!("{dir}/{}", self.object_name)
        }
    }
}
