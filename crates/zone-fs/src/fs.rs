//! The filesystem surface over one storage zone.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::StatusCode;
use secrecy::SecretString;
use serde::Deserialize;
use tracing::{instrument, warn};

use zone_client::models::StorageEntry;
use zone_client::{
    ApiError, ConfigError, DownloadOptions, HttpClient, StreamingResponse, ZoneClient,
    ZoneClientBuilder, path,
};

use crate::cache::{DirListing, ListingCache};
use crate::entry::{Directory, Entry, Object};
use crate::error::Error;

/// Checksum algorithms the remote can verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumAlgorithm {
    /// 256-bit SHA-2, hex-encoded.
    Sha256,
}

/// Connection settings for one storage zone.
///
/// Deserializable so an external configuration layer can produce it
/// directly; the access key never leaves [`SecretString`] unredacted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Options {
    /// Storage zone name.
    pub storage_zone: String,
    /// Zone access key.
    pub access_key: SecretString,
}

/// A hierarchical filesystem view of one storage zone.
///
/// All operations take `&self` and may run concurrently; the listing
/// cache is the only shared mutable state and is owned per instance, so
/// independent adapters never see each other's cache. The adapter imposes
/// no ordering between concurrent operations — for writes to the same
/// path the zone's own last-writer-wins semantics govern.
#[derive(Debug)]
pub struct ZoneFs<C: HttpClient> {
    name: String,
    root: String,
    client: ZoneClient<C>,
    cache: ListingCache,
}

#[cfg(feature = "reqwest-client")]
impl ZoneFs<zone_client::ReqwestClient> {
    /// Create an adapter named `name`, rooted at `root` within the zone.
    ///
    /// Fails when the zone name or access key is empty; nothing is sent to
    /// the remote at construction time.
    pub fn new(name: &str, root: &str, options: &Options) -> Result<Self, ConfigError> {
        let client = ZoneClientBuilder::new(&options.storage_zone, options.access_key.clone())
            .build()?;
        Ok(Self::with_client(name, root, client))
    }
}

impl<C: HttpClient> ZoneFs<C> {
    /// Create an adapter over a pre-built client (custom backends,
    /// alternative endpoints, tests).
    #[must_use]
    pub fn with_client(name: &str, root: &str, client: ZoneClient<C>) -> Self {
        Self {
            name: name.to_owned(),
            root: root.trim_matches('/').to_owned(),
            client,
            cache: ListingCache::new(),
        }
    }

    /// Configured remote name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Root path within the zone (normalized, `""` = zone root).
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Checksum algorithms the remote supports.
    #[must_use]
    pub fn checksum_algorithms(&self) -> &'static [ChecksumAlgorithm] {
        &[ChecksumAlgorithm::Sha256]
    }

    /// Zone-relative path for a logical path under the configured root.
    fn full_path(&self, remote: &str) -> String {
        path::join(&self.root, remote)
    }

    /// Fetch or reuse the listing for logical directory `dir`.
    async fn listing(&self, dir: &str) -> Result<Arc<DirListing>, Error> {
        let zone_dir = self.full_path(dir);
        self.cache
            .get_or_fetch(dir, || async move {
                match self.client.list(&zone_dir).await {
                    Ok(entries) => Ok(entries),
                    Err(ApiError::Status(StatusCode::NOT_FOUND)) => Err(Error::DirectoryNotFound),
                    Err(err) => Err(err.into()),
                }
            })
            .await
    }

    fn object_from_record(dir: &str, record: &StorageEntry) -> Object {
        Object {
            remote: record.full_path(dir),
            size: Some(record.length),
            mod_time: record.mod_time(),
            checksum: record
                .checksum
                .as_deref()
                .filter(|checksum| !checksum.is_empty())
                .map(str::to_ascii_lowercase),
        }
    }

    fn entry_from_record(dir: &str, record: &StorageEntry) -> Entry {
        if record.is_directory {
            Entry::Directory(Directory {
                remote: record.full_path(dir),
                mod_time: record.mod_time(),
            })
        } else {
            Entry::File(Self::object_from_record(dir, record))
        }
    }

    /// List logical directory `dir` (`""` = root).
    ///
    /// Entries come back in the zone's order. Fails with
    /// [`Error::DirectoryNotFound`] when the remote reports the directory
    /// absent.
    #[instrument(skip(self), fields(zone = %self.client.storage_zone(), root = %self.root))]
    pub async fn list(&self, dir: &str) -> Result<Vec<Entry>, Error> {
        let listing = self.listing(dir).await?;
        Ok(listing
            .entries
            .iter()
            .map(|record| Self::entry_from_record(&listing.dir, record))
            .collect())
    }

    /// Resolve the file object at logical path `remote`.
    ///
    /// Scans the parent listing for the final path segment, files before
    /// directories. A directory match is [`Error::IsDirectory`] — distinct
    /// from [`Error::ObjectNotFound`] so callers can react differently.
    #[instrument(skip(self), fields(zone = %self.client.storage_zone(), root = %self.root))]
    pub async fn resolve(&self, remote: &str) -> Result<Object, Error> {
        let name = path::base_name(remote);
        let listing = self.listing(path::parent(remote)).await?;

        if let Some(record) = listing
            .entries
            .iter()
            .find(|record| !record.is_directory && record.object_name == name)
        {
            return Ok(Self::object_from_record(&listing.dir, record));
        }
        if listing
            .entries
            .iter()
            .any(|record| record.is_directory && record.object_name == name)
        {
            return Err(Error::IsDirectory);
        }
        Err(Error::ObjectNotFound)
    }

    /// Store `content` at logical path `remote`, replacing any existing
    /// object.
    ///
    /// A known source checksum is forwarded so the zone verifies the bytes
    /// it stored. The success response does not re-describe the object, so
    /// the returned [`Object`] reports an unknown size; listing the parent
    /// re-learns it from the zone.
    #[instrument(
        skip(self, content),
        fields(zone = %self.client.storage_zone(), root = %self.root, len = content.len())
    )]
    pub async fn upload(
        &self,
        remote: &str,
        content: Bytes,
        checksum: Option<&str>,
    ) -> Result<Object, Error> {
        self.put_object(remote, content, checksum).await
    }

    /// Replace the content of an existing object. Same contract as
    /// [`ZoneFs::upload`], addressed at the object's own path.
    #[instrument(
        skip(self, object, content),
        fields(zone = %self.client.storage_zone(), remote = %object.remote)
    )]
    pub async fn update(
        &self,
        object: &Object,
        content: Bytes,
        checksum: Option<&str>,
    ) -> Result<Object, Error> {
        self.put_object(&object.remote, content, checksum).await
    }

    async fn put_object(
        &self,
        remote: &str,
        content: Bytes,
        checksum: Option<&str>,
    ) -> Result<Object, Error> {
        self.client
            .upload(&self.full_path(remote), content, checksum)
            .await?;
        // The parent's listing no longer describes this directory.
        self.cache.invalidate(path::parent(remote));
        Ok(Object {
            remote: remote.to_owned(),
            size: None,
            mod_time: Utc::now(),
            checksum: checksum
                .filter(|checksum| !checksum.is_empty())
                .map(str::to_ascii_lowercase),
        })
    }

    /// Open `object` for reading.
    ///
    /// Returns the zone's response with the body as a chunk stream;
    /// dropping the stream aborts the transfer. Any non-success status is
    /// reported as [`Error::ObjectNotFound`], with the body drained first.
    #[instrument(
        skip(self, object, options),
        fields(zone = %self.client.storage_zone(), remote = %object.remote)
    )]
    pub async fn download(
        &self,
        object: &Object,
        options: &DownloadOptions,
    ) -> Result<StreamingResponse, Error> {
        match self
            .client
            .download(&self.full_path(&object.remote), options)
            .await
        {
            Ok(response) => Ok(response),
            Err(ApiError::Status(status)) => {
                warn!(%status, "object fetch rejected");
                Err(Error::ObjectNotFound)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Delete `object` from the zone.
    #[instrument(
        skip(self, object),
        fields(zone = %self.client.storage_zone(), remote = %object.remote)
    )]
    pub async fn delete(&self, object: &Object) -> Result<(), Error> {
        let result = self.client.delete_file(&self.full_path(&object.remote)).await;
        self.cache.invalidate(path::parent(&object.remote));
        result.map_err(Error::from)
    }

    /// Create logical directory `dir`.
    ///
    /// The zone auto-creates directories along upload paths, so explicit
    /// creation exists for empty directories; creating a directory that
    /// already exists succeeds. The root always exists — an empty `dir` is
    /// a no-op.
    #[instrument(skip(self), fields(zone = %self.client.storage_zone(), root = %self.root))]
    pub async fn make_directory(&self, dir: &str) -> Result<(), Error> {
        if dir.is_empty() {
            return Ok(());
        }
        self.client.create_directory(&self.full_path(dir)).await?;
        self.cache.invalidate(path::parent(dir));
        Ok(())
    }

    /// Remove logical directory `dir`.
    ///
    /// The zone enforces emptiness; a non-empty directory comes back as
    /// [`Error::RemoteRejected`] with the zone's own status, an absent one
    /// as [`Error::DirectoryNotFound`].
    #[instrument(skip(self), fields(zone = %self.client.storage_zone(), root = %self.root))]
    pub async fn remove_directory(&self, dir: &str) -> Result<(), Error> {
        match self.client.remove_directory(&self.full_path(dir)).await {
            Ok(()) => {}
            Err(ApiError::Status(StatusCode::NOT_FOUND)) => return Err(Error::DirectoryNotFound),
            Err(err) => return Err(err.into()),
        }
        self.cache.invalidate(dir);
        self.cache.invalidate(path::parent(dir));
        Ok(())
    }

    /// The zone derives modification times from uploads; callers cannot
    /// set them.
    pub fn set_modification_time(
        &self,
        _object: &Object,
        _mod_time: DateTime<Utc>,
    ) -> Result<(), Error> {
        Err(Error::ModTimeUnsupported)
    }
}

impl<C: HttpClient> std::fmt::Display for ZoneFs<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "storage zone {} path /{}",
            self.client.storage_zone(),
            self.root
        )
    }
}
