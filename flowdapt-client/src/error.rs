//! Error types for the Flowdapt client.

use flowdapt_core::FlowdaptError;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur when using the Flowdapt client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A custom transport failed to deliver the request.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Server returned a non-2xx response.
    #[error(
        "API error (status {status}): {}",
        detail.as_deref().unwrap_or("no detail")
    )]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error code from the server, if present.
        code: Option<i64>,
        /// Error detail from the server, if present.
        detail: Option<String>,
        /// The full error body; a JSON string when the body was not JSON.
        body: Value,
    },

    /// Schema validation, version resolution or operation misuse.
    #[error(transparent)]
    Schema(#[from] FlowdaptError),

    /// Failed to parse a response body as JSON.
    #[error("Failed to deserialize response: {0}")]
    Deserialize(#[from] serde_json::Error),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid response format.
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Build an API error from a status and a raw error body.
    ///
    /// `code` and `detail` are lifted from a JSON body when present.
    pub fn from_error_body(status: u16, raw: &[u8]) -> Self {
        let body = serde_json::from_slice::<Value>(raw)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(raw).into_owned()));

        let code = body.get("code").and_then(Value::as_i64);
        let detail = body
            .get("detail")
            .and_then(Value::as_str)
            .map(str::to_string);

        Self::Api {
            status,
            code,
            detail,
            body,
        }
    }

    /// HTTP status of an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The core error behind a schema failure.
    pub fn as_schema_error(&self) -> Option<&FlowdaptError> {
        match self {
            Self::Schema(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_body_with_code_and_detail() {
        let err =
            ClientError::from_error_body(404, br#"{"code": 404, "detail": "Config not found"}"#);
        match &err {
            ClientError::Api {
                status,
                code,
                detail,
                body,
            } => {
                assert_eq!(*status, 404);
                assert_eq!(*code, Some(404));
                assert_eq!(detail.as_deref(), Some("Config not found"));
                assert_eq!(body, &json!({ "code": 404, "detail": "Config not found" }));
            }
            other => panic!("Expected Api error, got {other:?}"),
        }
        assert_eq!(err.status(), Some(404));
        assert!(err.to_string().contains("Config not found"));
    }

    #[test]
    fn test_error_body_not_json() {
        let err = ClientError::from_error_body(502, b"Bad Gateway");
        match err {
            ClientError::Api {
                code, detail, body, ..
            } => {
                assert!(code.is_none());
                assert!(detail.is_none());
                assert_eq!(body, json!("Bad Gateway"));
            }
            other => panic!("Expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_schema_error_is_transparent() {
        let err: ClientError = FlowdaptError::invalid_operation("read", "no body").into();
        assert!(err.to_string().starts_with("E220"));
        assert!(err.as_schema_error().unwrap().is_invalid_operation());
    }
}
