//! Binding a logical operation to a concrete schema version.
//!
//! The binder is the single place where a façade call turns into wire
//! data: it resolves the codec, validates the body and hands back the
//! decoder for the response. It performs no I/O.

use crate::codec::{FromEnvelope, TypedEnvelope, VersionedCodec};
use crate::error::{FlowdaptError, Result};
use crate::negotiation::{build_accept_header, build_version_header, ResourceKind};
use crate::registry::VersionRegistry;
use serde::Serialize;
use serde_json::Value;

/// Key a raw JSON body may carry to select its schema version.
pub const VERSION_MARKER: &str = "__version";

/// A Rust DTO bound to one schema version of one resource kind.
pub trait VersionedDto: Serialize {
    /// Resource kind the DTO belongs to.
    const KIND: ResourceKind;
    /// Schema version the DTO was declared for.
    const VERSION: &'static str;
}

/// An outgoing request body.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// A serialized DTO that knows its kind and version.
    Typed {
        /// Resource kind of the DTO.
        kind: ResourceKind,
        /// Schema version of the DTO.
        version: String,
        /// Serialized DTO.
        value: Value,
    },
    /// Free-form JSON, optionally carrying a `"__version"` marker.
    Raw(Value),
}

impl RequestBody {
    /// Serialize a DTO into a typed body.
    ///
    /// # Errors
    ///
    /// Returns [`FlowdaptError::Deserialize`] if the DTO cannot be
    /// represented as JSON.
    pub fn from_dto<T: VersionedDto>(dto: &T) -> Result<Self> {
        let value = serde_json::to_value(dto).map_err(|e| FlowdaptError::Deserialize {
            schema: format!("{}.{}", T::KIND, T::VERSION),
            target: "JSON".to_string(),
            cause: e.to_string(),
        })?;
        Ok(Self::Typed {
            kind: T::KIND,
            version: T::VERSION.to_string(),
            value,
        })
    }

    /// The version the body declares for itself, if any.
    pub fn declared_version(&self) -> Option<&str> {
        match self {
            Self::Typed { version, .. } => Some(version),
            Self::Raw(Value::Object(map)) => map.get(VERSION_MARKER).and_then(Value::as_str),
            Self::Raw(_) => None,
        }
    }

    /// The body without its version marker.
    pub fn into_payload(self) -> Value {
        match self {
            Self::Typed { value, .. } => value,
            Self::Raw(Value::Object(mut map)) => {
                map.remove(VERSION_MARKER);
                Value::Object(map)
            }
            Self::Raw(value) => value,
        }
    }

    fn typed_kind(&self) -> Option<ResourceKind> {
        match self {
            Self::Typed { kind, .. } => Some(*kind),
            Self::Raw(_) => None,
        }
    }
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        Self::Raw(value)
    }
}

/// Conversion of caller input into a [`RequestBody`].
pub trait IntoRequestBody {
    /// Convert `self` into a request body.
    fn into_request_body(self) -> Result<RequestBody>;
}

impl IntoRequestBody for RequestBody {
    fn into_request_body(self) -> Result<RequestBody> {
        Ok(self)
    }
}

impl IntoRequestBody for Value {
    fn into_request_body(self) -> Result<RequestBody> {
        Ok(RequestBody::Raw(self))
    }
}

impl<T: VersionedDto> IntoRequestBody for T {
    fn into_request_body(self) -> Result<RequestBody> {
        RequestBody::from_dto(&self)
    }
}

/// Decodes the response of one bound request.
#[derive(Debug, Clone, Copy)]
pub struct ResponseDecoder<'r> {
    codec: &'r VersionedCodec,
}

impl<'r> ResponseDecoder<'r> {
    /// Wrap a codec.
    pub fn new(codec: &'r VersionedCodec) -> Self {
        Self { codec }
    }

    /// The codec responses are decoded with.
    pub fn codec(&self) -> &'r VersionedCodec {
        self.codec
    }

    /// Media type to negotiate for the response.
    pub fn content_type(&self) -> &'r str {
        self.codec.content_type()
    }

    /// Decode a single response body.
    pub fn decode(&self, wire: &Value) -> Result<TypedEnvelope> {
        self.codec.decode(wire)
    }

    /// Decode a list response body.
    pub fn decode_list(&self, wire: &Value) -> Result<Vec<TypedEnvelope>> {
        self.codec.decode_list(wire)
    }

    /// Decode a single response body into `T`.
    pub fn decode_as<T: FromEnvelope>(&self, wire: &Value) -> Result<T> {
        T::from_envelope(self.decode(wire)?)
    }

    /// Decode a list response body into `Vec<T>`, preserving order.
    pub fn decode_list_as<T: FromEnvelope>(&self, wire: &Value) -> Result<Vec<T>> {
        self.decode_list(wire)?
            .into_iter()
            .map(T::from_envelope)
            .collect()
    }
}

/// The result of binding: what to send and how to read the answer.
#[derive(Debug, Clone)]
pub struct BoundRequest<'r> {
    /// Encoded body, absent for no-body operations.
    pub body: Option<Value>,
    /// Decoder for the response.
    pub decoder: ResponseDecoder<'r>,
    /// Resolved schema version.
    pub version: String,
}

impl BoundRequest<'_> {
    /// Resource kind of the bound codec.
    pub fn kind(&self) -> ResourceKind {
        self.decoder.codec().kind()
    }

    /// Value of the version header, `"<kind>.<version>"`.
    pub fn version_header(&self) -> Result<String> {
        build_version_header(self.kind().as_str(), &self.version)
    }

    /// Value of the `Accept` header for the response codec.
    pub fn accept_header(&self) -> Result<String> {
        build_accept_header(self.decoder.content_type(), 1.0)
    }
}

/// Resolves codecs and encodes request bodies.
pub struct RequestBinder;

impl RequestBinder {
    /// Bind an operation.
    ///
    /// Version precedence is: `explicit`, then the version the body
    /// declares, then the registry's latest.
    ///
    /// # Errors
    ///
    /// - [`FlowdaptError::UnsupportedVersion`] if the version is unknown
    /// - [`FlowdaptError::InvalidOperation`] if a body is sent to a
    ///   no-body operation, a write operation has no body, or a typed
    ///   body belongs to another resource kind
    /// - [`FlowdaptError::SchemaValidation`] if the body is invalid
    pub fn bind<'r>(
        registry: &'r VersionRegistry,
        body: Option<RequestBody>,
        explicit: Option<&str>,
    ) -> Result<BoundRequest<'r>> {
        let declared = body.as_ref().and_then(RequestBody::declared_version);
        let codec = registry.resolve_with(explicit, declared)?;

        tracing::trace!(
            kind = %registry.kind(),
            operation = %registry.operation(),
            version = codec.version(),
            "Resolved codec"
        );

        if let Some(kind) = body.as_ref().and_then(RequestBody::typed_kind) {
            if kind != registry.kind() {
                return Err(FlowdaptError::invalid_operation(
                    registry.operation().as_str(),
                    format!("a {} body cannot be sent as {}", kind, registry.kind()),
                ));
            }
        }

        let payload = body.map(RequestBody::into_payload);
        let encoded = match (codec.accepts_body(), payload) {
            (false, None) => None,
            (false, Some(payload)) if is_empty_payload(&payload) => None,
            (false, Some(_)) => {
                return Err(FlowdaptError::invalid_operation(
                    registry.operation().as_str(),
                    format!(
                        "{} {} takes no request body",
                        registry.kind(),
                        registry.operation()
                    ),
                ));
            }
            (true, None) | (true, Some(Value::Null)) => {
                return Err(FlowdaptError::invalid_operation(
                    registry.operation().as_str(),
                    format!(
                        "{} {} requires a request body",
                        registry.kind(),
                        registry.operation()
                    ),
                ));
            }
            (true, Some(payload)) => Some(codec.encode(&payload)?),
        };

        Ok(BoundRequest {
            body: encoded,
            decoder: ResponseDecoder::new(codec),
            version: codec.version().to_string(),
        })
    }
}

fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
