//! Declarative wire schemas for Flowdapt resources.
//!
//! Schemas describe the shape of a JSON document closely enough to
//! validate it, apply field defaults and normalize the few values the
//! server emits loosely (timestamps). They are built once, at first use,
//! and are immutable afterwards.
//!
//! # Core Components
//!
//! - [`Schema`] - A node in a schema tree
//! - [`ObjectSchema`] - A named object with declared fields
//! - [`Field`] - One object field with its presence rules
//! - [`SchemaValidator`] - Validates and normalizes values
//!
//! # Example
//!
//! ```
//! use flowdapt_core::schema::{Field, ObjectSchema, Schema, SchemaValidator};
//! use serde_json::json;
//!
//! let schema = Schema::object(
//!     ObjectSchema::new("Stage")
//!         .field(Field::required("name", Schema::String))
//!         .field(Field::with_default("description", Schema::String, json!(""))),
//! );
//!
//! let value = SchemaValidator::validate(&schema, &json!({ "name": "train" })).unwrap();
//! assert_eq!(value, json!({ "name": "train", "description": "" }));
//! ```

mod datetime;
mod validator;

pub use datetime::{format_datetime, parse_loose_datetime};
pub use validator::SchemaValidator;
pub(crate) use validator::describe_value;

use serde_json::Value;

/// A node in a schema tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    /// Any JSON value, including null.
    Any,
    /// A JSON string.
    String,
    /// A string holding a UUID.
    Uuid,
    /// A JSON number.
    Number,
    /// A JSON number without a fractional part or exponent.
    Integer,
    /// A JSON boolean.
    Boolean,
    /// A timestamp. Accepts loosely formatted strings and epoch
    /// milliseconds, normalizes to RFC 3339 UTC.
    DateTime,
    /// A string restricted to a fixed set of literals.
    Enum(Vec<&'static str>),
    /// A string that must equal one constant (a `kind` discriminator).
    Literal(&'static str),
    /// A homogeneous array.
    Array(Box<Schema>),
    /// A string-keyed map with homogeneous values.
    Record(Box<Schema>),
    /// An object with declared fields.
    Object(ObjectSchema),
    /// Alternatives tried in declaration order; the first match wins.
    Union(Vec<Schema>),
}

impl Schema {
    /// Create an enum schema.
    pub fn enumeration(values: &[&'static str]) -> Self {
        Self::Enum(values.to_vec())
    }

    /// Create an array schema.
    pub fn array(items: Schema) -> Self {
        Self::Array(Box::new(items))
    }

    /// Create a map schema.
    pub fn record(values: Schema) -> Self {
        Self::Record(Box::new(values))
    }

    /// Create an object schema.
    pub fn object(object: ObjectSchema) -> Self {
        Self::Object(object)
    }

    /// Create a union schema.
    pub fn union(alternatives: Vec<Schema>) -> Self {
        Self::Union(alternatives)
    }

    /// Name used in error messages for this schema.
    pub fn name(&self) -> String {
        match self {
            Self::Object(object) => object.name.to_string(),
            other => other.describe(),
        }
    }

    /// Short description of what this schema accepts.
    pub fn describe(&self) -> String {
        match self {
            Self::Any => "any value".to_string(),
            Self::String => "string".to_string(),
            Self::Uuid => "uuid string".to_string(),
            Self::Number => "number".to_string(),
            Self::Integer => "integer".to_string(),
            Self::Boolean => "boolean".to_string(),
            Self::DateTime => "date".to_string(),
            Self::Enum(values) => format!("one of [{}]", values.join(", ")),
            Self::Literal(value) => format!("literal \"{}\"", value),
            Self::Array(items) => format!("array of {}", items.describe()),
            Self::Record(values) => format!("map of {}", values.describe()),
            Self::Object(object) => format!("object {}", object.name),
            Self::Union(alternatives) => alternatives
                .iter()
                .map(Schema::describe)
                .collect::<Vec<_>>()
                .join(" | "),
        }
    }
}

/// A named object schema.
///
/// Keys not declared as fields are dropped from the normalized value.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSchema {
    /// Schema name, used in error messages.
    pub name: &'static str,
    /// Declared fields, in declaration order.
    pub fields: Vec<Field>,
}

impl ObjectSchema {
    /// Create an object schema with no fields.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    /// Add a field.
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// One field of an object schema.
///
/// Presence rules:
/// - required: the key must be present
/// - optional: an absent key stays absent
/// - default: an absent key is filled with the default
///
/// Independently, `nullable` decides whether an explicit `null` is accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// JSON key.
    pub name: &'static str,
    /// Schema of the value.
    pub schema: Schema,
    /// Whether the key may be absent.
    pub optional: bool,
    /// Whether an explicit `null` is accepted.
    pub nullable: bool,
    /// Value supplied when the key is absent.
    pub default: Option<Value>,
}

impl Field {
    /// A field that must be present.
    pub fn required(name: &'static str, schema: Schema) -> Self {
        Self {
            name,
            schema,
            optional: false,
            nullable: false,
            default: None,
        }
    }

    /// A field that may be absent.
    pub fn optional(name: &'static str, schema: Schema) -> Self {
        Self {
            optional: true,
            ..Self::required(name, schema)
        }
    }

    /// A field filled with `default` when absent.
    pub fn with_default(name: &'static str, schema: Schema, default: Value) -> Self {
        Self {
            optional: true,
            default: Some(default),
            ..Self::required(name, schema)
        }
    }

    /// Accept an explicit `null` for this field.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn describe_nested_schemas() {
        let schema = Schema::union(vec![Schema::String, Schema::record(Schema::String)]);
        assert_eq!(schema.describe(), "string | map of string");

        let schema = Schema::enumeration(&["annotation", "name"]);
        assert_eq!(schema.describe(), "one of [annotation, name]");
    }

    #[test]
    fn field_presence_builders() {
        let f = Field::required("name", Schema::String);
        assert!(!f.optional && !f.nullable && f.default.is_none());

        let f = Field::optional("uid", Schema::Uuid);
        assert!(f.optional && f.default.is_none());

        let f = Field::with_default("priority", Schema::Number, Value::Null).nullable();
        assert!(f.optional && f.nullable);
        assert_eq!(f.default, Some(json!(null)));
    }

    #[test]
    fn object_field_lookup() {
        let object = ObjectSchema::new("Thing")
            .field(Field::required("a", Schema::String))
            .field(Field::optional("b", Schema::Number));

        assert!(object.get("b").is_some());
        assert!(object.get("c").is_none());
        assert_eq!(Schema::object(object).name(), "Thing");
    }
}
