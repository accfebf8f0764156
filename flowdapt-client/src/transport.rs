//! HTTP transport seam.
//!
//! The client sends each request exactly once through an [`HttpTransport`].
//! Timeouts, TLS and connection pooling belong to the transport; the
//! default one is backed by reqwest.

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use bytes::{Bytes, BytesMut};
use flowdapt_core::negotiation::is_json_media_type;
use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use url::Url;

/// Boxed future returned by transports.
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Streamed response body.
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// A fully built request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL, query included.
    pub url: Url,
    /// Request headers.
    pub headers: HeaderMap,
    /// Serialized body.
    pub body: Option<Bytes>,
}

/// A response whose body has not been read yet.
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HeaderMap,
    /// Value of the `Content-Type` header, if any.
    pub content_type: Option<String>,
    /// Response body.
    pub body: ByteStream,
}

impl HttpResponse {
    /// Create a response from a status, headers and a body stream.
    pub fn new(status: u16, headers: HeaderMap, body: ByteStream) -> Self {
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Self {
            status,
            headers,
            content_type,
            body,
        }
    }

    /// Create a response with a fully buffered body.
    pub fn from_bytes(status: u16, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        Self::new(
            status,
            headers,
            futures::stream::once(async move { Ok(body) }).boxed(),
        )
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Read the whole body.
    pub async fn bytes(self) -> Result<Bytes> {
        let chunks: Vec<Bytes> = self.body.try_collect().await?;
        let mut buf = BytesMut::new();
        for chunk in chunks {
            buf.extend_from_slice(&chunk);
        }
        Ok(buf.freeze())
    }

    /// Read the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidResponse`] if the server declared a
    /// non-JSON content type, or [`ClientError::Deserialize`] if the body
    /// does not parse.
    pub async fn json(self) -> Result<Value> {
        if let Some(content_type) = self.content_type.as_deref() {
            if !is_json_media_type(content_type) {
                return Err(ClientError::InvalidResponse(format!(
                    "expected a JSON body, got content type '{}'",
                    content_type
                )));
            }
        }
        let raw = self.bytes().await?;
        Ok(serde_json::from_slice(&raw)?)
    }

    /// Read the body as JSON when declared as such, as a string otherwise.
    pub async fn content(self) -> Result<Value> {
        let is_json = self
            .content_type
            .as_deref()
            .map(is_json_media_type)
            .unwrap_or(false);
        let raw = self.bytes().await?;

        if raw.is_empty() {
            Ok(Value::Null)
        } else if is_json {
            Ok(serde_json::from_slice(&raw)?)
        } else {
            Ok(Value::String(String::from_utf8_lossy(&raw).into_owned()))
        }
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// Sends requests to the server.
pub trait HttpTransport: Send + Sync {
    /// Send one request and return the response without reading its body.
    ///
    /// Non-2xx statuses are returned as responses, not errors.
    fn send<'a>(&'a self, request: HttpRequest) -> TransportFuture<'a, HttpResponse>;
}

/// Default transport backed by a reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport honoring the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http })
    }

    /// Wrap an existing reqwest client.
    pub fn from_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl HttpTransport for ReqwestTransport {
    fn send<'a>(&'a self, request: HttpRequest) -> TransportFuture<'a, HttpResponse> {
        Box::pin(async move {
            let mut builder = self
                .http
                .request(request.method, request.url)
                .headers(request.headers);
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let headers = response.headers().clone();
            let body = response.bytes_stream().map_err(ClientError::Http).boxed();

            Ok(HttpResponse::new(status, headers, body))
        })
    }
}
