//! Trigger rule resources.

use super::base::{resource_schema, V1Alpha1ResourceMetadata};
use super::V1ALPHA1;
use crate::negotiation::ResourceKind;
use crate::schema::{Field, ObjectSchema, Schema};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind discriminator of trigger rule resources.
pub const TRIGGER_RULE_KIND: &str = "trigger_rule";

/// When a trigger rule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum V1Alpha1TriggerRuleType {
    /// Fires on a cron-like schedule.
    Schedule,
    /// Fires when a condition over events holds.
    Condition,
}

/// What a trigger rule does when it fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct V1Alpha1TriggerRuleAction {
    /// Target to invoke (e.g. `run_workflow`).
    pub target: String,
    /// Parameters passed to the target.
    pub parameters: Map<String, Value>,
}

/// The rule body: a condition tree or a schedule list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum V1Alpha1TriggerRule {
    /// Condition expression.
    Condition(Map<String, Value>),
    /// Schedule entries.
    Schedule(Vec<String>),
}

/// Spec of a trigger rule resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct V1Alpha1TriggerRuleResourceSpec {
    /// Rule type.
    #[serde(rename = "type")]
    pub rule_type: V1Alpha1TriggerRuleType,
    /// Rule body.
    pub rule: V1Alpha1TriggerRule,
    /// Action to take.
    pub action: V1Alpha1TriggerRuleAction,
}

/// A trigger rule resource as sent and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct V1Alpha1TriggerRuleResource {
    /// Always `"trigger_rule"`.
    #[serde(default = "trigger_rule_kind")]
    pub kind: String,
    /// Resource metadata.
    pub metadata: V1Alpha1ResourceMetadata,
    /// Resource spec.
    pub spec: V1Alpha1TriggerRuleResourceSpec,
}

impl V1Alpha1TriggerRuleResource {
    /// Create a trigger rule resource.
    pub fn new(metadata: V1Alpha1ResourceMetadata, spec: V1Alpha1TriggerRuleResourceSpec) -> Self {
        Self {
            kind: trigger_rule_kind(),
            metadata,
            spec,
        }
    }
}

/// Body of a create trigger rule request.
pub type V1Alpha1TriggerRuleResourceCreateRequest = V1Alpha1TriggerRuleResource;
/// Body of an update trigger rule request.
pub type V1Alpha1TriggerRuleResourceUpdateRequest = V1Alpha1TriggerRuleResource;

fn trigger_rule_kind() -> String {
    TRIGGER_RULE_KIND.to_string()
}

versioned_dto!(
    V1Alpha1TriggerRuleResource,
    ResourceKind::TriggerRule,
    V1ALPHA1
);

versioned_response! {
    /// A trigger rule returned by any trigger operation.
    TriggerRuleResponse {
        V1Alpha1(V1Alpha1TriggerRuleResource) => "v1alpha1",
    }
}

/// Wire schema of [`V1Alpha1TriggerRuleResourceSpec`].
pub fn v1alpha1_spec_schema() -> Schema {
    let action = Schema::object(
        ObjectSchema::new("V1Alpha1TriggerRuleAction")
            .field(Field::required("target", Schema::String))
            .field(Field::required("parameters", Schema::record(Schema::Any))),
    );

    Schema::object(
        ObjectSchema::new("V1Alpha1TriggerRuleResourceSpec")
            .field(Field::required(
                "type",
                Schema::enumeration(&["schedule", "condition"]),
            ))
            .field(Field::required(
                "rule",
                Schema::union(vec![
                    Schema::record(Schema::Any),
                    Schema::array(Schema::String),
                ]),
            ))
            .field(Field::required("action", action)),
    )
}

/// Wire schema of [`V1Alpha1TriggerRuleResource`].
pub fn v1alpha1_resource_schema() -> Schema {
    resource_schema(
        "V1Alpha1TriggerRuleResource",
        TRIGGER_RULE_KIND,
        v1alpha1_spec_schema(),
    )
}
