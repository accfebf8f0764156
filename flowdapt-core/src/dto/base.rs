//! Types shared by every resource.

use crate::schema::{Field, ObjectSchema, Schema};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Metadata attached to every stored resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct V1Alpha1ResourceMetadata {
    /// Server-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<Uuid>,
    /// Resource name, unique per kind.
    pub name: String,
    /// Creation time, set by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time, set by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Free-form string annotations.
    pub annotations: HashMap<String, String>,
}

impl V1Alpha1ResourceMetadata {
    /// Metadata for a new resource: a name and no annotations.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            uid: None,
            name: name.into(),
            created_at: None,
            updated_at: None,
            annotations: HashMap::new(),
        }
    }

    /// Add an annotation.
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }
}

/// Wire schema of [`V1Alpha1ResourceMetadata`].
pub fn v1alpha1_metadata_schema() -> Schema {
    Schema::object(
        ObjectSchema::new("V1Alpha1ResourceMetadata")
            .field(Field::optional("uid", Schema::Uuid))
            .field(Field::required("name", Schema::String))
            .field(Field::optional("created_at", Schema::DateTime))
            .field(Field::optional("updated_at", Schema::DateTime))
            .field(Field::required(
                "annotations",
                Schema::record(Schema::String),
            )),
    )
}

/// Schema of a resource object: `kind`, `metadata` and a kind-specific `spec`.
///
/// `kind` is filled with its constant when absent.
pub(crate) fn resource_schema(name: &'static str, kind: &'static str, spec: Schema) -> Schema {
    Schema::object(
        ObjectSchema::new(name)
            .field(Field::with_default(
                "kind",
                Schema::Literal(kind),
                serde_json::Value::String(kind.to_string()),
            ))
            .field(Field::required("metadata", v1alpha1_metadata_schema()))
            .field(Field::required("spec", spec)),
    )
}
