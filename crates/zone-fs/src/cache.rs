//! Per-adapter cache of directory listings.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use tracing::trace;

use zone_client::models::StorageEntry;

/// A directory listing as fetched from the remote.
#[derive(Debug)]
pub(crate) struct DirListing {
    /// Directory path the listing describes (normalized, `""` = root).
    pub dir: String,
    /// Listing records in remote order.
    pub entries: Vec<StorageEntry>,
    /// When the listing was fetched.
    pub fetched_at: Instant,
}

/// Maps directory paths to their last fetched listing.
///
/// Entries never expire on their own; a mutation of a directory's contents
/// removes its entry outright and the next lookup re-fetches. Out-of-band
/// writers are therefore invisible until this adapter mutates the same
/// directory itself. Concurrent lookups of the same missing directory may
/// each fetch — the listing endpoint is read-only, so the duplicate work
/// is bounded waste rather than a correctness problem.
#[derive(Default)]
pub(crate) struct ListingCache {
    listings: scc::HashMap<String, Arc<DirListing>>,
}

impl std::fmt::Debug for ListingCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingCache")
            .field("len", &self.listings.len())
            .finish_non_exhaustive()
    }
}

impl ListingCache {
    pub fn new() -> Self {
        Self {
            listings: scc::HashMap::new(),
        }
    }

    /// Normalize the conventional current-directory marker to the root
    /// key, so `"."` and `""` address the same entry.
    fn normalize(dir: &str) -> &str {
        if dir == "." { "" } else { dir }
    }

    /// Return the cached listing for `dir`, fetching and storing it on a
    /// miss.
    ///
    /// A failed fetch stores nothing and propagates the error unchanged.
    pub async fn get_or_fetch<F, Fut, E>(&self, dir: &str, fetch: F) -> Result<Arc<DirListing>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<StorageEntry>, E>>,
    {
        let dir = Self::normalize(dir);
        if let Some(listing) = self.listings.read_sync(dir, |_, listing| Arc::clone(listing)) {
            trace!(dir, age = ?listing.fetched_at.elapsed(), "listing cache hit");
            return Ok(listing);
        }

        let entries = fetch().await?;
        let listing = Arc::new(DirListing {
            dir: dir.to_owned(),
            entries,
            fetched_at: Instant::now(),
        });
        trace!(dir, count = listing.entries.len(), "stored directory listing");
        self.listings
            .upsert_sync(dir.to_owned(), Arc::clone(&listing));
        Ok(listing)
    }

    /// Drop the cached listing for `dir`, if any.
    pub fn invalidate(&self, dir: &str) {
        let dir = Self::normalize(dir);
        if self.listings.remove_sync(dir).is_some() {
            trace!(dir, "invalidated directory listing");
        }
    }
}
