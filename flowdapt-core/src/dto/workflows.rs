//! Workflow definitions and workflow runs.

use super::base::{resource_schema, V1Alpha1ResourceMetadata};
use super::V1ALPHA1;
use crate::negotiation::ResourceKind;
use crate::schema::{Field, ObjectSchema, Schema};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

/// Kind discriminator of workflow resources.
pub const WORKFLOW_KIND: &str = "workflow";

/// How a stage is executed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum V1Alpha1WorkflowStageType {
    /// Runs the target once.
    #[default]
    Simple,
    /// Maps the target over its input.
    Parameterized,
}

/// One stage of a workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct V1Alpha1WorkflowStage {
    /// Execution mode.
    #[serde(rename = "type", default)]
    pub stage_type: V1Alpha1WorkflowStageType,
    /// Import path of the callable to run.
    pub target: String,
    /// Stage name, unique within the workflow.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Stage version.
    #[serde(default)]
    pub version: String,
    /// Names of stages that must finish first.
    #[serde(default)]
    pub depends_on: Vec<String>,
    /// Executor options.
    #[serde(default)]
    pub options: Map<String, Value>,
    /// Resource requirements.
    #[serde(default)]
    pub resources: Map<String, Value>,
    /// Scheduling priority.
    #[serde(default)]
    pub priority: Option<f64>,
}

impl V1Alpha1WorkflowStage {
    /// A simple stage with every optional field defaulted.
    pub fn new(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            stage_type: V1Alpha1WorkflowStageType::Simple,
            target: target.into(),
            name: name.into(),
            description: String::new(),
            version: String::new(),
            depends_on: Vec::new(),
            options: Map::new(),
            resources: Map::new(),
            priority: None,
        }
    }

    /// Declare stages this stage depends on.
    pub fn depends_on<I, S>(mut self, stages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = stages.into_iter().map(Into::into).collect();
        self
    }
}

/// Spec of a workflow resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct V1Alpha1WorkflowResourceSpec {
    /// Stages, in any order; `depends_on` defines the graph.
    pub stages: Vec<V1Alpha1WorkflowStage>,
}

/// A workflow resource as sent and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct V1Alpha1WorkflowResource {
    /// Always `"workflow"`.
    #[serde(default = "workflow_kind")]
    pub kind: String,
    /// Resource metadata.
    pub metadata: V1Alpha1ResourceMetadata,
    /// Resource spec.
    pub spec: V1Alpha1WorkflowResourceSpec,
}

impl V1Alpha1WorkflowResource {
    /// Create a workflow resource.
    pub fn new(metadata: V1Alpha1ResourceMetadata, spec: V1Alpha1WorkflowResourceSpec) -> Self {
        Self {
            kind: workflow_kind(),
            metadata,
            spec,
        }
    }
}

/// Body of a create workflow request.
pub type V1Alpha1WorkflowResourceCreateRequest = V1Alpha1WorkflowResource;
/// Body of an update workflow request.
pub type V1Alpha1WorkflowResourceUpdateRequest = V1Alpha1WorkflowResource;

fn workflow_kind() -> String {
    WORKFLOW_KIND.to_string()
}

/// Lifecycle state of a workflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum V1Alpha1WorkflowRunState {
    /// Accepted, not started.
    Pending,
    /// Executing.
    Running,
    /// Completed successfully.
    Finished,
    /// Completed with an error.
    Failed,
}

impl V1Alpha1WorkflowRunState {
    /// Whether the run has stopped.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Failed)
    }
}

/// One execution of a workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct V1Alpha1WorkflowRun {
    /// Run identifier.
    pub uid: Uuid,
    /// Run name.
    pub name: String,
    /// Name of the workflow that was run.
    pub workflow: String,
    /// Start time.
    pub started_at: DateTime<Utc>,
    /// End time, once the run has stopped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    /// Workflow output, or the error for failed runs.
    #[serde(default)]
    pub result: Value,
    /// Lifecycle state.
    pub state: V1Alpha1WorkflowRunState,
    /// What started the run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

versioned_dto!(V1Alpha1WorkflowResource, ResourceKind::Workflow, V1ALPHA1);

versioned_response! {
    /// A workflow returned by any workflow operation.
    WorkflowResponse {
        V1Alpha1(V1Alpha1WorkflowResource) => "v1alpha1",
    }
}

versioned_response! {
    /// A workflow run returned by any run operation.
    WorkflowRunResponse {
        V1Alpha1(V1Alpha1WorkflowRun) => "v1alpha1",
    }
}

/// Wire schema of [`V1Alpha1WorkflowStage`].
pub fn v1alpha1_stage_schema() -> Schema {
    Schema::object(
        ObjectSchema::new("V1Alpha1WorkflowStage")
            .field(Field::with_default(
                "type",
                Schema::enumeration(&["simple", "parameterized"]),
                json!("simple"),
            ))
            .field(Field::required("target", Schema::String))
            .field(Field::required("name", Schema::String))
            .field(Field::with_default(
                "description",
                Schema::String,
                json!(""),
            ))
            .field(Field::with_default("version", Schema::String, json!("")))
            .field(Field::with_default(
                "depends_on",
                Schema::array(Schema::String),
                json!([]),
            ))
            .field(Field::with_default(
                "options",
                Schema::record(Schema::Any),
                json!({}),
            ))
            .field(Field::with_default(
                "resources",
                Schema::record(Schema::Any),
                json!({}),
            ))
            .field(Field::with_default("priority", Schema::Number, Value::Null).nullable()),
    )
}

/// Wire schema of [`V1Alpha1WorkflowResourceSpec`].
pub fn v1alpha1_spec_schema() -> Schema {
    Schema::object(
        ObjectSchema::new("V1Alpha1WorkflowResourceSpec")
            .field(Field::required(
                "stages",
                Schema::array(v1alpha1_stage_schema()),
            )),
    )
}

/// Wire schema of [`V1Alpha1WorkflowResource`].
pub fn v1alpha1_resource_schema() -> Schema {
    resource_schema(
        "V1Alpha1WorkflowResource",
        WORKFLOW_KIND,
        v1alpha1_spec_schema(),
    )
}

/// Wire schema of [`V1Alpha1WorkflowRun`].
pub fn v1alpha1_run_schema() -> Schema {
    Schema::object(
        ObjectSchema::new("V1Alpha1WorkflowRun")
            .field(Field::required("uid", Schema::Uuid))
            .field(Field::required("name", Schema::String))
            .field(Field::required("workflow", Schema::String))
            .field(Field::required("started_at", Schema::DateTime))
            .field(Field::optional("finished_at", Schema::DateTime))
            .field(Field::optional("result", Schema::Any))
            .field(Field::required(
                "state",
                Schema::enumeration(&["pending", "running", "finished", "failed"]),
            ))
            .field(Field::optional("source", Schema::String)),
    )
}
