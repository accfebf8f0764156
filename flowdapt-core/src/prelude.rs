//! Prelude for convenient imports.
//!
//! This module re-exports the most commonly used types and traits.
//!
//! # Example
//!
//! ```
//! use flowdapt_core::prelude::*;
//! ```

// Error handling
pub use crate::error::{FlowdaptError, Result, Violation};

// Pipeline
pub use crate::binder::{IntoRequestBody, RequestBinder, RequestBody, VersionedDto};
pub use crate::codec::{FromEnvelope, TypedEnvelope, VersionedCodec};
pub use crate::negotiation::{Operation, ResourceKind};
pub use crate::registry::VersionRegistry;

// Shared DTOs
pub use crate::dto::base::V1Alpha1ResourceMetadata;
pub use crate::dto::configs::{
    ConfigResponse, V1Alpha1ConfigResource, V1Alpha1ConfigResourceSpec, V1Alpha1ConfigSelector,
};
pub use crate::dto::metrics::{MetricsResponse, V1Alpha1Metrics, V1Alpha1MetricsValue};
pub use crate::dto::plugins::{
    PluginFilesResponse, PluginResponse, V1Alpha1Plugin, V1Alpha1PluginFiles,
};
pub use crate::dto::system::{SystemStatusResponse, V1Alpha1SystemStatus};
pub use crate::dto::triggers::{
    TriggerRuleResponse, V1Alpha1TriggerRuleResource, V1Alpha1TriggerRuleResourceSpec,
};
pub use crate::dto::workflows::{
    V1Alpha1WorkflowResource, V1Alpha1WorkflowResourceSpec, V1Alpha1WorkflowRun,
    V1Alpha1WorkflowRunState, V1Alpha1WorkflowStage, WorkflowResponse, WorkflowRunResponse,
};
