//! Core Flowdapt client implementation.

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
use bytes::Bytes;
use flowdapt_core::negotiation::{APPLICATION_JSON, VERSION_HEADER};
use flowdapt_core::{BoundRequest, FromEnvelope};
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT,
};
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Shared HTTP plumbing used by every resource API.
///
/// Cloning is cheap; clones share the transport.
///
/// # Example
///
/// ```no_run
/// use flowdapt_client::Client;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::new("http://localhost:8080")?
///     .with_api_key("my-secret-key")
///     .with_timeout(Duration::from_secs(10))?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    /// Parsed base URL.
    base_url: Url,
    /// Configuration the client was built from.
    config: ClientConfig,
    /// Transport requests are sent through.
    transport: Arc<dyn HttpTransport>,
    /// Whether `transport` was built from `config` and may be rebuilt.
    owns_transport: bool,
}

impl Client {
    /// Create a client for `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be
    /// created.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::from_config(ClientConfig::new(base_url))
    }

    /// Create a client from a configuration, using the reqwest transport.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(&config)?;
        let mut client = Self::with_transport(config, Arc::new(transport))?;
        client.owns_transport = true;
        Ok(client)
    }

    /// Create a client that sends requests through `transport`.
    ///
    /// The transport is used as given: timeouts configured on this client
    /// are recorded in [`Client::config`] but enforcing them is up to the
    /// transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        config.validate()?;
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(format!(
                "{} cannot be used as a base URL",
                config.base_url
            )));
        }

        Ok(Self {
            base_url,
            config,
            transport,
            owns_transport: false,
        })
    }

    /// Set an API key for authentication.
    ///
    /// The API key will be sent in the `Authorization` header as `Bearer <key>`.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = Some(api_key.into());
        self
    }

    /// Set a custom timeout for all requests.
    ///
    /// Rebuilds the reqwest transport the client created itself. A
    /// transport passed to [`Client::with_transport`] is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout is zero or the HTTP client cannot
    /// be rebuilt.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.config.timeout = timeout;
        self.config.validate()?;
        if self.owns_transport {
            self.transport = Arc::new(ReqwestTransport::new(&self.config)?);
        }
        Ok(self)
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Configuration in effect.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build a URL from path segments.
    ///
    /// Segments are percent-encoded; an empty last segment yields a
    /// trailing slash. `.` and `..` are rejected since URL normalization
    /// would drop them.
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url> {
        if let Some(dot) = segments.iter().find(|s| is_dot_segment(s)) {
            return Err(ClientError::InvalidUrl(format!(
                "path segment '{}' cannot be encoded",
                dot
            )));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ClientError::InvalidUrl(format!("{} cannot be used as a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
        HeaderValue::from_str(value)
            .map_err(|_| ClientError::Config(format!("invalid value for header {}", name)))
    }

    /// Send a request and fail on non-2xx statuses.
    pub(crate) async fn execute(&self, request: ApiRequest<'_>) -> Result<HttpResponse> {
        let mut url = self.url(&request.segments)?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            Self::header_value("User-Agent", &self.config.user_agent)?,
        );
        if let Some(ref key) = self.config.api_key {
            headers.insert(
                AUTHORIZATION,
                Self::header_value("Authorization", &format!("Bearer {}", key))?,
            );
        }
        if let Some(ref accept) = request.accept {
            headers.insert(ACCEPT, Self::header_value("Accept", accept)?);
        }
        if let Some(ref version) = request.version {
            let name = HeaderName::from_bytes(VERSION_HEADER.as_bytes()).map_err(|_| {
                ClientError::Config(format!("invalid header name {}", VERSION_HEADER))
            })?;
            headers.insert(name, Self::header_value(VERSION_HEADER, version)?);
        }

        let body = match request.body {
            Some(ref value) => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
                Some(Bytes::from(serde_json::to_vec(value)?))
            }
            None => None,
        };

        debug!(
            method = %request.method,
            url = %url,
            version = request.version.as_deref().unwrap_or("-"),
            "Dispatching request"
        );

        let response = self
            .transport
            .send(HttpRequest {
                method: request.method,
                url,
                headers,
                body,
            })
            .await?;

        debug!(status = response.status, "Received response");

        if response.is_success() {
            Ok(response)
        } else {
            let status = response.status;
            let raw = response.bytes().await?;
            Err(ClientError::from_error_body(status, &raw))
        }
    }

    /// Send a request and read its body as JSON.
    pub(crate) async fn fetch_json(&self, request: ApiRequest<'_>) -> Result<Value> {
        self.execute(request).await?.json().await
    }

    /// Send a bound operation and decode the single resource it returns.
    pub(crate) async fn call<T: FromEnvelope>(
        &self,
        request: ApiRequest<'_>,
        bound: &BoundRequest<'_>,
    ) -> Result<T> {
        let wire = self.fetch_json(request.bound(bound)?).await?;
        Ok(bound.decoder.decode_as(&wire)?)
    }

    /// Send a bound operation and decode the list it returns.
    pub(crate) async fn call_list<T: FromEnvelope>(
        &self,
        request: ApiRequest<'_>,
        bound: &BoundRequest<'_>,
    ) -> Result<Vec<T>> {
        let wire = self.fetch_json(request.bound(bound)?).await?;
        Ok(bound.decoder.decode_list_as(&wire)?)
    }
}

fn is_dot_segment(segment: &str) -> bool {
    matches!(segment, "." | "..")
}

/// Check an identifier that fills one path segment.
///
/// Empty and dot identifiers would address another route, so they are
/// rejected before any URL is built.
pub(crate) fn path_id<'a>(what: &str, identifier: &'a str) -> Result<&'a str> {
    if identifier.is_empty() || is_dot_segment(identifier) {
        return Err(ClientError::InvalidUrl(format!(
            "invalid {} identifier '{}'",
            what, identifier
        )));
    }
    Ok(identifier)
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .field("user_agent", &self.config.user_agent)
            .field("timeout", &self.config.timeout)
            .field(
                "api_key",
                &self.config.api_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// One API call, before URL resolution and header assembly.
#[derive(Debug, Clone)]
pub(crate) struct ApiRequest<'a> {
    method: Method,
    segments: Vec<&'a str>,
    query: Vec<(&'static str, String)>,
    accept: Option<String>,
    version: Option<String>,
    body: Option<Value>,
}

impl<'a> ApiRequest<'a> {
    /// Start a request to the path made of `segments`.
    pub(crate) fn new(method: Method, segments: &[&'a str]) -> Self {
        Self {
            method,
            segments: segments.to_vec(),
            query: Vec::new(),
            accept: None,
            version: None,
            body: None,
        }
    }

    /// Negotiate headers and body from a bound operation.
    pub(crate) fn bound(mut self, bound: &BoundRequest<'_>) -> Result<Self> {
        self.accept = Some(bound.accept_header()?);
        self.version = Some(bound.version_header()?);
        self.body = bound.body.clone();
        Ok(self)
    }

    /// Set the `Accept` header.
    pub(crate) fn accept(mut self, accept: String) -> Self {
        self.accept = Some(accept);
        self
    }

    /// Set a JSON body.
    pub(crate) fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Append a query parameter.
    pub(crate) fn query(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_new() {
        let client = Client::new("http://localhost:8080").unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8080/");
        assert!(client.config().api_key.is_none());
    }

    #[test]
    fn test_client_with_api_key() {
        let client = Client::new("http://localhost:8080")
            .unwrap()
            .with_api_key("test-key");
        assert_eq!(client.config().api_key, Some("test-key".to_string()));
        assert!(format!("{:?}", client).contains("<redacted>"));
    }

    #[test]
    fn test_client_invalid_url() {
        assert!(Client::new("not-a-url").is_err());
    }

    #[test]
    fn test_url_building() {
        let client = Client::new("http://localhost:8080").unwrap();
        assert_eq!(
            client.url(&["configs", ""]).unwrap().as_str(),
            "http://localhost:8080/configs/"
        );
        assert_eq!(
            client.url(&["configs", "my-config"]).unwrap().as_str(),
            "http://localhost:8080/configs/my-config"
        );
        let root = client.url(&[""]).unwrap();
        assert_eq!(root.as_str(), "http://localhost:8080/");
    }

    #[test]
    fn test_url_building_with_base_path() {
        let client = Client::new("http://localhost:8080/api/").unwrap();
        assert_eq!(
            client.url(&["status"]).unwrap().as_str(),
            "http://localhost:8080/api/status"
        );
    }

    #[test]
    fn test_url_rejects_dot_segments() {
        let client = Client::new("http://localhost:8080").unwrap();
        assert!(matches!(
            client.url(&["configs", ".."]),
            Err(ClientError::InvalidUrl(_))
        ));
        assert!(matches!(
            client.url(&["workflows", "run", "."]),
            Err(ClientError::InvalidUrl(_))
        ));
        assert!(client.url(&["configs", "..."]).is_ok());
    }

    #[test]
    fn test_path_id() {
        assert_eq!(path_id("config", "cfg").unwrap(), "cfg");
        assert_eq!(path_id("config", ".hidden").unwrap(), ".hidden");
        for bad in ["", ".", ".."] {
            assert!(matches!(
                path_id("config", bad),
                Err(ClientError::InvalidUrl(_))
            ));
        }
    }

    #[test]
    fn test_url_segments_are_encoded() {
        let client = Client::new("http://localhost:8080").unwrap();
        let url = client
            .url(&["plugin", "p", "files", "dir/a b.txt"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/plugin/p/files/dir%2Fa%20b.txt"
        );
    }
}
