//! HTTP client abstraction for pluggable backends.

use bytes::Bytes;
use futures::StreamExt as _;
use futures::stream::BoxStream;
use http::{HeaderMap, Method, StatusCode};
use std::future::Future;

use crate::error::HttpClientError;

/// An HTTP request to be sent by an [`HttpClient`] implementation.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// The HTTP method.
    pub method: Method,
    /// The fully-qualified URL.
    pub url: String,
    /// Request headers.
    pub headers: HeaderMap,
    /// Optional request body.
    pub body: Option<Bytes>,
}

/// An HTTP response whose body has been read to completion.
#[derive(Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body bytes.
    pub body: Bytes,
}

/// A lazily-consumed response body.
pub type BodyStream = BoxStream<'static, Result<Bytes, HttpClientError>>;

/// An HTTP response whose body is consumed incrementally.
pub struct StreamingResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body chunks.
    pub body: BodyStream,
}

impl StreamingResponse {
    /// Consume and discard the remaining body.
    ///
    /// Every path that abandons the body early must drain it so the
    /// underlying connection can be returned to the pool.
    pub async fn drain(mut self) {
        while let Some(chunk) = self.body.next().await {
            if chunk.is_err() {
                break;
            }
        }
    }

    /// Read the remaining body into one buffer.
    pub async fn bytes(mut self) -> Result<Bytes, HttpClientError> {
        let mut buf = Vec::new();
        while let Some(chunk) = self.body.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(Bytes::from(buf))
    }
}

impl std::fmt::Debug for StreamingResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Trait for pluggable HTTP client backends.
///
/// Uses Rust edition 2024's native `impl Future` in traits (RPITIT) —
/// no `async-trait` macro required.
///
/// `send` reads the response body to completion before returning, so a
/// response handed to the caller is always fully drained.
pub trait HttpClient: Send + Sync {
    /// Send an HTTP request and return the buffered response.
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, HttpClientError>> + Send;

    /// Send an HTTP request and return the response body as a stream.
    ///
    /// The default implementation buffers via [`HttpClient::send`];
    /// backends that can stream natively should override it.
    fn send_streaming(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<StreamingResponse, HttpClientError>> + Send {
        async move {
            let response = self.send(request).await?;
            Ok(StreamingResponse {
                status: response.status,
                headers: response.headers,
                body: futures::stream::once(async move { Ok(response.body) }).boxed(),
            })
        }
    }
}
