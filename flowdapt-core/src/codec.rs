//! Versioned codecs and the typed envelopes they produce.

use crate::error::{FlowdaptError, Result, Violation};
use crate::negotiation::ResourceKind;
use crate::schema::{describe_value, Schema, SchemaValidator};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Binds one schema version of one operation to its wire shapes.
///
/// A codec without a request schema belongs to an operation that sends no
/// body (GET, DELETE). Codecs are built once and never mutated.
#[derive(Debug, Clone)]
pub struct VersionedCodec {
    kind: ResourceKind,
    version: String,
    request_schema: Option<Schema>,
    response_schema: Option<Schema>,
    content_type: String,
}

impl VersionedCodec {
    /// Create a codec with neither request nor response schema.
    ///
    /// The content type defaults to the versioned media type of `kind`.
    pub fn new(kind: ResourceKind, version: impl Into<String>) -> Self {
        let version = version.into();
        Self {
            content_type: kind.content_type(&version),
            kind,
            version,
            request_schema: None,
            response_schema: None,
        }
    }

    /// Set the request schema.
    pub fn with_request(mut self, schema: Schema) -> Self {
        self.request_schema = Some(schema);
        self
    }

    /// Set the response schema.
    pub fn with_response(mut self, schema: Schema) -> Self {
        self.response_schema = Some(schema);
        self
    }

    /// Override the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Resource kind this codec belongs to.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Schema version identifier.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Media type of the response body.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Request schema, if the operation takes a body.
    pub fn request_schema(&self) -> Option<&Schema> {
        self.request_schema.as_ref()
    }

    /// Response schema, if the operation returns a body.
    pub fn response_schema(&self) -> Option<&Schema> {
        self.response_schema.as_ref()
    }

    /// Whether the operation accepts a request body.
    pub fn accepts_body(&self) -> bool {
        self.request_schema.is_some()
    }

    /// Validate `value` against the request schema and return the wire JSON.
    ///
    /// An empty value (`null` or `{}`) against a codec without a request
    /// schema encodes to `null`.
    ///
    /// # Errors
    ///
    /// Returns [`FlowdaptError::SchemaValidation`] if the codec has no
    /// request schema and `value` is not empty, or if validation fails.
    pub fn encode(&self, value: &Value) -> Result<Value> {
        match &self.request_schema {
            Some(schema) => SchemaValidator::validate(schema, value),
            None if is_empty(value) => Ok(Value::Null),
            None => Err(FlowdaptError::validation(
                format!("{}.{} request", self.kind, self.version),
                vec![Violation::new("", "no request body", describe_value(value))],
            )),
        }
    }

    /// Validate a response body and wrap it in a [`TypedEnvelope`].
    ///
    /// # Errors
    ///
    /// Returns [`FlowdaptError::SchemaValidation`] if the codec has no
    /// response schema or validation fails.
    pub fn decode(&self, wire: &Value) -> Result<TypedEnvelope> {
        let schema = self.require_response_schema(wire)?;
        let value = SchemaValidator::validate(schema, wire)?;
        Ok(self.envelope(value))
    }

    /// Decode a JSON array of response bodies.
    ///
    /// All-or-nothing: a single invalid item fails the whole list.
    pub fn decode_list(&self, wire: &Value) -> Result<Vec<TypedEnvelope>> {
        let schema = self.require_response_schema(wire)?;
        let items = SchemaValidator::validate_list(schema, wire)?;
        Ok(items
            .into_iter()
            .map(|value| self.envelope(value))
            .collect())
    }

    fn require_response_schema(&self, wire: &Value) -> Result<&Schema> {
        self.response_schema.as_ref().ok_or_else(|| {
            FlowdaptError::validation(
                format!("{}.{} response", self.kind, self.version),
                vec![Violation::new("", "no response body", describe_value(wire))],
            )
        })
    }

    fn envelope(&self, value: Value) -> TypedEnvelope {
        TypedEnvelope {
            kind: self.kind,
            version: self.version.clone(),
            value,
        }
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// A validated, defaulted body tagged with the version it was decoded as.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedEnvelope {
    kind: ResourceKind,
    version: String,
    value: Value,
}

impl TypedEnvelope {
    /// Resource kind of the body.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Schema version the body was validated against.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Normalized JSON.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Take the normalized JSON.
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Map the normalized JSON onto a Rust DTO.
    ///
    /// # Errors
    ///
    /// Returns [`FlowdaptError::Deserialize`] if the DTO does not match the
    /// validated shape.
    pub fn into_dto<T: DeserializeOwned>(self) -> Result<T> {
        let schema = format!("{}.{}", self.kind, self.version);
        serde_json::from_value(self.value).map_err(|e| FlowdaptError::Deserialize {
            schema,
            target: std::any::type_name::<T>().to_string(),
            cause: e.to_string(),
        })
    }
}

/// Conversion from a decoded envelope into a version-aware response type.
pub trait FromEnvelope: Sized {
    /// Build `Self` from an envelope, selecting the variant by version.
    fn from_envelope(envelope: TypedEnvelope) -> Result<Self>;
}

impl FromEnvelope for TypedEnvelope {
    fn from_envelope(envelope: TypedEnvelope) -> Result<Self> {
        Ok(envelope)
    }
}

impl FromEnvelope for Value {
    fn from_envelope(envelope: TypedEnvelope) -> Result<Self> {
        Ok(envelope.into_value())
    }
}
