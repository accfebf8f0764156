//! Config resources.
//!
//! A config holds arbitrary data plus a selector deciding which workflows
//! or stages receive it.

use super::base::{resource_schema, V1Alpha1ResourceMetadata};
use super::V1ALPHA1;
use crate::negotiation::ResourceKind;
use crate::schema::{Field, ObjectSchema, Schema};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Kind discriminator of config resources.
pub const CONFIG_KIND: &str = "config";

/// How a config selects its targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum V1Alpha1ConfigSelectorType {
    /// Match resources by annotation.
    Annotation,
    /// Match resources by name.
    Name,
}

/// Selector value: a single name or a set of annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum V1Alpha1ConfigSelectorValue {
    /// A resource name.
    Name(String),
    /// Annotations that must all match.
    Annotations(HashMap<String, String>),
}

/// Selector of a config resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct V1Alpha1ConfigSelector {
    /// Kind of resource selected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Selection strategy.
    #[serde(rename = "type")]
    pub selector_type: V1Alpha1ConfigSelectorType,
    /// What to match.
    pub value: Option<V1Alpha1ConfigSelectorValue>,
}

impl V1Alpha1ConfigSelector {
    /// Select resources by name.
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            kind: None,
            selector_type: V1Alpha1ConfigSelectorType::Name,
            value: Some(V1Alpha1ConfigSelectorValue::Name(name.into())),
        }
    }

    /// Select resources by annotations.
    pub fn by_annotations(annotations: HashMap<String, String>) -> Self {
        Self {
            kind: None,
            selector_type: V1Alpha1ConfigSelectorType::Annotation,
            value: Some(V1Alpha1ConfigSelectorValue::Annotations(annotations)),
        }
    }
}

/// Spec of a config resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct V1Alpha1ConfigResourceSpec {
    /// Target selector.
    pub selector: V1Alpha1ConfigSelector,
    /// Config payload.
    pub data: Map<String, Value>,
}

/// A config resource as sent and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct V1Alpha1ConfigResource {
    /// Always `"config"`.
    #[serde(default = "config_kind")]
    pub kind: String,
    /// Resource metadata.
    pub metadata: V1Alpha1ResourceMetadata,
    /// Resource spec.
    pub spec: V1Alpha1ConfigResourceSpec,
}

impl V1Alpha1ConfigResource {
    /// Create a config resource.
    pub fn new(metadata: V1Alpha1ResourceMetadata, spec: V1Alpha1ConfigResourceSpec) -> Self {
        Self {
            kind: config_kind(),
            metadata,
            spec,
        }
    }
}

/// Body of a create config request.
pub type V1Alpha1ConfigResourceCreateRequest = V1Alpha1ConfigResource;
/// Body of an update config request.
pub type V1Alpha1ConfigResourceUpdateRequest = V1Alpha1ConfigResource;

fn config_kind() -> String {
    CONFIG_KIND.to_string()
}

versioned_dto!(V1Alpha1ConfigResource, ResourceKind::Config, V1ALPHA1);

versioned_response! {
    /// A config resource returned by any config operation.
    ConfigResponse {
        V1Alpha1(V1Alpha1ConfigResource) => "v1alpha1",
    }
}

/// Wire schema of [`V1Alpha1ConfigSelector`].
pub fn v1alpha1_selector_schema() -> Schema {
    Schema::object(
        ObjectSchema::new("V1Alpha1ConfigSelector")
            .field(Field::optional("kind", Schema::String).nullable())
            .field(Field::required(
                "type",
                Schema::enumeration(&["annotation", "name"]),
            ))
            .field(
                Field::required(
                    "value",
                    Schema::union(vec![Schema::String, Schema::record(Schema::String)]),
                )
                .nullable(),
            ),
    )
}

/// Wire schema of [`V1Alpha1ConfigResourceSpec`].
pub fn v1alpha1_spec_schema() -> Schema {
    Schema::object(
        ObjectSchema::new("V1Alpha1ConfigResourceSpec")
            .field(Field::required("selector", v1alpha1_selector_schema()))
            .field(Field::required("data", Schema::record(Schema::Any))),
    )
}

/// Wire schema of [`V1Alpha1ConfigResource`].
pub fn v1alpha1_resource_schema() -> Schema {
    resource_schema(
        "V1Alpha1ConfigResource",
        CONFIG_KIND,
        v1alpha1_spec_schema(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaValidator;
    use serde_json::json;

    #[test]
    fn selector_value_may_be_null_but_not_absent() {
        let schema = v1alpha1_selector_schema();
        let selector = json!({ "type": "name", "value": null });
        assert!(SchemaValidator::validate(&schema, &selector).is_ok());

        let err = SchemaValidator::validate(&schema, &json!({ "type": "name" })).unwrap_err();
        assert_eq!(err.violations().unwrap()[0].path, "value");
    }

    #[test]
    fn selector_type_is_an_enum() {
        let err = SchemaValidator::validate(
            &v1alpha1_selector_schema(),
            &json!({ "type": "label", "value": "x" }),
        )
        .unwrap_err();
        assert_eq!(err.violations().unwrap()[0].path, "type");
    }

    #[test]
    fn selector_serde_shapes() {
        let by_name = V1Alpha1ConfigSelector::by_name("train");
        assert_eq!(
            serde_json::to_value(&by_name).unwrap(),
            json!({ "type": "name", "value": "train" })
        );

        let selector: V1Alpha1ConfigSelector =
            serde_json::from_value(json!({ "type": "annotation", "value": { "team": "ml" } }))
                .unwrap();
        assert_eq!(
            selector.selector_type,
            V1Alpha1ConfigSelectorType::Annotation
        );
        assert!(matches!(
            selector.value,
            Some(V1Alpha1ConfigSelectorValue::Annotations(_))
        ));
    }

    #[test]
    fn resource_kind_defaults_on_deserialize() {
        let resource: V1Alpha1ConfigResource = serde_json::from_value(json!({
            "metadata": { "name": "cfg", "annotations": {} },
            "spec": { "selector": { "type": "name", "value": "wf" }, "data": {} }
        }))
        .unwrap();
        assert_eq!(resource.kind, "config");
    }
}
