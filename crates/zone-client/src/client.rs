//! Typed client for a single storage zone.

use std::time::Duration;

use bytes::Bytes;
use http::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, RANGE};
use http::{Method, StatusCode};
use secrecy::{ExposeSecret as _, SecretString};
use tracing::{debug, trace, warn};

use crate::error::{ApiError, ConfigError, HttpClientError};
use crate::http_client::{HttpClient, HttpRequest, HttpResponse, StreamingResponse};
use crate::models::StorageEntry;
use crate::pacer::{AttemptOutcome, Pacer, PacerConfig};
use crate::path;

#[cfg(feature = "reqwest-client")]
use crate::backends::ReqwestClient;

/// Default storage endpoint.
const DEFAULT_ENDPOINT: &str = "https://storage.bunnycdn.com";

/// Default per-request timeout for the bundled backend.
#[cfg(feature = "reqwest-client")]
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Extra delay demanded before retrying a rate-limited request, on top of
/// the pacer's own exponential state.
const RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(5);

/// Header carrying the zone access key.
static ACCESS_KEY: HeaderName = HeaderName::from_static("accesskey");
/// Header carrying the expected content checksum on uploads.
static CHECKSUM: HeaderName = HeaderName::from_static("checksum");

/// Builder for [`ZoneClient`].
#[derive(Debug)]
pub struct ZoneClientBuilder {
    storage_zone: String,
    access_key: SecretString,
    endpoint: String,
    pacer: PacerConfig,
}

impl ZoneClientBuilder {
    /// Start building a client for `storage_zone` authenticated by
    /// `access_key`.
    #[must_use]
    pub fn new(storage_zone: &str, access_key: SecretString) -> Self {
        Self {
            storage_zone: storage_zone.to_owned(),
            access_key,
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            pacer: PacerConfig::default(),
        }
    }

    /// Override the storage endpoint (regional endpoints, test servers).
    #[must_use]
    pub fn endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_owned();
        self
    }

    /// Override the retry and backoff tuning.
    #[must_use]
    pub fn pacer(mut self, config: PacerConfig) -> Self {
        self.pacer = config;
        self
    }

    /// Build a client with the bundled reqwest backend.
    #[cfg(feature = "reqwest-client")]
    pub fn build(self) -> Result<ZoneClient<ReqwestClient>, ConfigError> {
        self.build_with(ReqwestClient::new(DEFAULT_TIMEOUT))
    }

    /// Build a client on top of a caller-supplied [`HttpClient`].
    pub fn build_with<C: HttpClient>(self, http: C) -> Result<ZoneClient<C>, ConfigError> {
        if self.storage_zone.is_empty() {
            return Err(ConfigError::MissingStorageZone);
        }
        let key = self.access_key.expose_secret();
        if key.is_empty() {
            return Err(ConfigError::MissingAccessKey);
        }
        let mut access_key =
            HeaderValue::from_str(key).map_err(|_| ConfigError::InvalidAccessKey)?;
        access_key.set_sensitive(true);
        debug!(zone = %self.storage_zone, endpoint = %self.endpoint, "constructed zone client");
        Ok(ZoneClient {
            http,
            storage_zone: self.storage_zone,
            endpoint: self.endpoint,
            access_key,
            pacer: Pacer::new(self.pacer),
        })
    }
}

/// Client for one storage zone.
///
/// Every method takes `&self`; one instance may serve any number of
/// concurrent operations. The retry pacer is shared across all of them so
/// backoff reacts to the zone's behavior as a whole.
#[derive(Debug)]
pub struct ZoneClient<C: HttpClient> {
    http: C,
    storage_zone: String,
    endpoint: String,
    /// Pre-validated `AccessKey` header, marked sensitive.
    access_key: HeaderValue,
    pacer: Pacer,
}

impl<C: HttpClient> ZoneClient<C> {
    /// Name of the storage zone this client addresses.
    #[must_use]
    pub fn storage_zone(&self) -> &str {
        &self.storage_zone
    }

    /// Host-relative resource path: `/zone/<escaped path>`, with a single
    /// trailing slash for directory-addressed resources.
    #[must_use]
    pub fn resource_path(&self, path: &str, directory: bool) -> String {
        let rel = path::escape(path.trim_matches('/'));
        let mut out = format!("/{}/{rel}", self.storage_zone);
        if directory && !out.ends_with('/') {
            out.push('/');
        }
        out
    }

    /// Absolute resource URL.
    #[must_use]
    pub fn resource_url(&self, path: &str, directory: bool) -> String {
        format!("{}{}", self.endpoint, self.resource_path(path, directory))
    }

    fn request(&self, method: Method, url: String) -> HttpRequest {
        let mut headers = HeaderMap::new();
        headers.insert(&ACCESS_KEY, self.access_key.clone());
        HttpRequest {
            method,
            url,
            headers,
            body: None,
        }
    }

    /// Shared retry classification: 429 always retries with the fixed
    /// extra delay, transient transport failures retry, everything else is
    /// handed back for the operation to interpret.
    fn classify(
        result: Result<HttpResponse, HttpClientError>,
    ) -> AttemptOutcome<HttpResponse, ApiError> {
        match result {
            Ok(response) if response.status == StatusCode::TOO_MANY_REQUESTS => {
                AttemptOutcome::Retry {
                    error: ApiError::RateLimited,
                    delay_hint: Some(RATE_LIMIT_BACKOFF),
                }
            }
            Ok(response) => AttemptOutcome::Ok(response),
            Err(error) if error.is_transient() => AttemptOutcome::Retry {
                error: ApiError::Http(error),
                delay_hint: None,
            },
            Err(error) => AttemptOutcome::Fatal(ApiError::Http(error)),
        }
    }

    /// Fetch the listing of `dir` (zone-relative, no trailing slash;
    /// empty for the zone root).
    pub async fn list(&self, dir: &str) -> Result<Vec<StorageEntry>, ApiError> {
        let url = self.resource_url(dir, true);
        let response = self
            .pacer
            .call(|| async {
                let mut request = self.request(Method::GET, url.clone());
                request
                    .headers
                    .insert(ACCEPT, HeaderValue::from_static("application/json"));
                Self::classify(self.http.send(request).await)
            })
            .await?;
        if !response.status.is_success() {
            return Err(ApiError::Status(response.status));
        }
        let entries: Vec<StorageEntry> = serde_json::from_slice(&response.body)?;
        trace!(dir, count = entries.len(), "fetched directory listing");
        Ok(entries)
    }

    /// Store `content` at `path`, replacing any existing object.
    ///
    /// The zone only reports success with `201 Created`; anything else is
    /// retried and, once the attempt budget is spent, surfaced with the
    /// observed status. `checksum` is forwarded upper-cased so the zone
    /// can verify the bytes it stored.
    pub async fn upload(
        &self,
        path: &str,
        content: Bytes,
        checksum: Option<&str>,
    ) -> Result<(), ApiError> {
        let url = self.resource_url(path, false);
        let checksum_header = checksum.and_then(|value| {
            match HeaderValue::from_str(&value.to_ascii_uppercase()) {
                Ok(header) => Some(header),
                Err(_) => {
                    warn!(path, "dropping checksum with non-header-safe bytes");
                    None
                }
            }
        });
        self.pacer
            .call(|| async {
                let mut request = self.request(Method::PUT, url.clone());
                if let Some(header) = &checksum_header {
                    request.headers.insert(&CHECKSUM, header.clone());
                }
                request.body = Some(content.clone());
                match Self::classify(self.http.send(request).await) {
                    AttemptOutcome::Ok(response) if response.status != StatusCode::CREATED => {
                        AttemptOutcome::Retry {
                            error: ApiError::Status(response.status),
                            delay_hint: None,
                        }
                    }
                    outcome => outcome,
                }
            })
            .await?;
        trace!(path, "stored object");
        Ok(())
    }

    /// Open `path` for reading, forwarding range and conditional headers.
    ///
    /// A non-success answer drains the body and surfaces the status;
    /// mapping it to a caller-facing error is the adapter's business.
    pub async fn download(
        &self,
        path: &str,
        options: &DownloadOptions,
    ) -> Result<StreamingResponse, ApiError> {
        let url = self.resource_url(path, false);
        let response = self
            .pacer
            .call(|| async {
                let mut request = self.request(Method::GET, url.clone());
                options.apply(&mut request.headers);
                match self.http.send_streaming(request).await {
                    Ok(response) if response.status == StatusCode::TOO_MANY_REQUESTS => {
                        response.drain().await;
                        AttemptOutcome::Retry {
                            error: ApiError::RateLimited,
                            delay_hint: Some(RATE_LIMIT_BACKOFF),
                        }
                    }
                    Ok(response) => AttemptOutcome::Ok(response),
                    Err(error) if error.is_transient() => AttemptOutcome::Retry {
                        error: ApiError::Http(error),
                        delay_hint: None,
                    },
                    Err(error) => AttemptOutcome::Fatal(ApiError::Http(error)),
                }
            })
            .await?;
        if !response.status.is_success() {
            let status = response.status;
            response.drain().await;
            return Err(ApiError::Status(status));
        }
        Ok(response)
    }

    /// Delete the object at `path`.
    pub async fn delete_file(&self, path: &str) -> Result<(), ApiError> {
        self.delete(self.resource_url(path, false)).await
    }

    /// Delete the directory at `dir`.
    ///
    /// The zone distinguishes directory deletion by the trailing slash and
    /// answers 404 when the directory does not exist.
    pub async fn remove_directory(&self, dir: &str) -> Result<(), ApiError> {
        self.delete(self.resource_url(dir, true)).await
    }

    async fn delete(&self, url: String) -> Result<(), ApiError> {
        let response = self
            .pacer
            .call(|| async {
                let request = self.request(Method::DELETE, url.clone());
                Self::classify(self.http.send(request).await)
            })
            .await?;
        if response.status != StatusCode::OK {
            return Err(ApiError::Status(response.status));
        }
        Ok(())
    }

    /// Create the directory at `dir`.
    ///
    /// The zone auto-creates intermediate directories along upload paths,
    /// so explicit creation is only needed for empty directories.
    /// Re-creating an existing directory succeeds.
    pub async fn create_directory(&self, dir: &str) -> Result<(), ApiError> {
        let url = self.resource_url(dir, true);
        let response = self
            .pacer
            .call(|| async {
                let mut request = self.request(Method::PUT, url.clone());
                request
                    .headers
                    .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                request.body = Some(Bytes::from_static(b"{}"));
                Self::classify(self.http.send(request).await)
            })
            .await?;
        if response.status != StatusCode::CREATED {
            return Err(ApiError::Status(response.status));
        }
        Ok(())
    }
}

/// Caller-supplied read options forwarded to the zone.
#[derive(Debug, Clone, Default)]
pub struct DownloadOptions {
    /// Byte range to request.
    pub range: Option<ByteRange>,
    /// Additional headers (conditional requests and the like), forwarded
    /// verbatim.
    pub headers: HeaderMap,
}

/// An inclusive byte range.
#[derive(Debug, Clone, Copy)]
pub struct ByteRange {
    /// First byte offset.
    pub start: u64,
    /// Last byte offset; open-ended when absent.
    pub end: Option<u64>,
}

impl DownloadOptions {
    fn apply(&self, headers: &mut HeaderMap) {
        for (name, value) in &self.headers {
            headers.insert(name, value.clone());
        }
        if let Some(range) = self.range {
            let value = match range.end {
                Some(end) => format!("bytes={}-{end}", range.start),
                None => format!("bytes={}-", range.start),
            };
            if let Ok(header) = HeaderValue::from_str(&value) {
                headers.insert(RANGE, header);
            }
        }
    }
}
