//! Static descriptor table binding every operation to its versioned codecs.
//!
//! Registries are built on first use and shared, read-only, by every
//! client. New schema versions are appended to the end of a registry; the
//! last entry is the latest.

use crate::codec::VersionedCodec;
use crate::dto::{configs, metrics, plugins, system, triggers, workflows, V1ALPHA1};
use crate::negotiation::{Operation, ResourceKind};
use crate::registry::VersionRegistry;
use once_cell::sync::Lazy;

/// Create config.
pub static CONFIG_CREATE: Lazy<VersionRegistry> = Lazy::new(|| {
    VersionRegistry::new(ResourceKind::Config, Operation::Create).register(
        VersionedCodec::new(ResourceKind::Config, V1ALPHA1)
            .with_request(configs::v1alpha1_resource_schema())
            .with_response(configs::v1alpha1_resource_schema()),
    )
});

/// Get, list and delete config.
pub static CONFIG_READ: Lazy<VersionRegistry> = Lazy::new(|| {
    VersionRegistry::new(ResourceKind::Config, Operation::Read).register(
        VersionedCodec::new(ResourceKind::Config, V1ALPHA1)
            .with_response(configs::v1alpha1_resource_schema()),
    )
});

/// Update config.
pub static CONFIG_UPDATE: Lazy<VersionRegistry> = Lazy::new(|| {
    VersionRegistry::new(ResourceKind::Config, Operation::Update).register(
        VersionedCodec::new(ResourceKind::Config, V1ALPHA1)
            .with_request(configs::v1alpha1_resource_schema())
            .with_response(configs::v1alpha1_resource_schema()),
    )
});

/// Create trigger rule.
pub static TRIGGER_CREATE: Lazy<VersionRegistry> = Lazy::new(|| {
    VersionRegistry::new(ResourceKind::TriggerRule, Operation::Create).register(
        VersionedCodec::new(ResourceKind::TriggerRule, V1ALPHA1)
            .with_request(triggers::v1alpha1_resource_schema())
            .with_response(triggers::v1alpha1_resource_schema()),
    )
});

/// Get, list and delete trigger rule.
pub static TRIGGER_READ: Lazy<VersionRegistry> = Lazy::new(|| {
    VersionRegistry::new(ResourceKind::TriggerRule, Operation::Read).register(
        VersionedCodec::new(ResourceKind::TriggerRule, V1ALPHA1)
            .with_response(triggers::v1alpha1_resource_schema()),
    )
});

/// Update trigger rule.
pub static TRIGGER_UPDATE: Lazy<VersionRegistry> = Lazy::new(|| {
    VersionRegistry::new(ResourceKind::TriggerRule, Operation::Update).register(
        VersionedCodec::new(ResourceKind::TriggerRule, V1ALPHA1)
            .with_request(triggers::v1alpha1_resource_schema())
            .with_response(triggers::v1alpha1_resource_schema()),
    )
});

/// Create workflow.
pub static WORKFLOW_CREATE: Lazy<VersionRegistry> = Lazy::new(|| {
    VersionRegistry::new(ResourceKind::Workflow, Operation::Create).register(
        VersionedCodec::new(ResourceKind::Workflow, V1ALPHA1)
            .with_request(workflows::v1alpha1_resource_schema())
            .with_response(workflows::v1alpha1_resource_schema()),
    )
});

/// Get, list and delete workflow.
pub static WORKFLOW_READ: Lazy<VersionRegistry> = Lazy::new(|| {
    VersionRegistry::new(ResourceKind::Workflow, Operation::Read).register(
        VersionedCodec::new(ResourceKind::Workflow, V1ALPHA1)
            .with_response(workflows::v1alpha1_resource_schema()),
    )
});

/// Update workflow.
pub static WORKFLOW_UPDATE: Lazy<VersionRegistry> = Lazy::new(|| {
    VersionRegistry::new(ResourceKind::Workflow, Operation::Update).register(
        VersionedCodec::new(ResourceKind::Workflow, V1ALPHA1)
            .with_request(workflows::v1alpha1_resource_schema())
            .with_response(workflows::v1alpha1_resource_schema()),
    )
});

/// Run a workflow, and get, list and delete runs.
///
/// Run input is free-form JSON, so no request schema is declared.
pub static WORKFLOW_RUN_READ: Lazy<VersionRegistry> = Lazy::new(|| {
    VersionRegistry::new(ResourceKind::WorkflowRun, Operation::Read).register(
        VersionedCodec::new(ResourceKind::WorkflowRun, V1ALPHA1)
            .with_response(workflows::v1alpha1_run_schema()),
    )
});

/// Read metrics.
pub static METRICS_READ: Lazy<VersionRegistry> = Lazy::new(|| {
    VersionRegistry::new(ResourceKind::Metrics, Operation::Read).register(
        VersionedCodec::new(ResourceKind::Metrics, V1ALPHA1)
            .with_response(metrics::v1alpha1_metrics_schema()),
    )
});

/// Get and list plugins.
pub static PLUGIN_READ: Lazy<VersionRegistry> = Lazy::new(|| {
    VersionRegistry::new(ResourceKind::Plugin, Operation::Read).register(
        VersionedCodec::new(ResourceKind::Plugin, V1ALPHA1)
            .with_response(plugins::v1alpha1_plugin_schema()),
    )
});

/// List plugin files.
pub static PLUGIN_FILES_READ: Lazy<VersionRegistry> = Lazy::new(|| {
    VersionRegistry::new(ResourceKind::PluginFiles, Operation::Read).register(
        VersionedCodec::new(ResourceKind::PluginFiles, V1ALPHA1)
            .with_response(plugins::v1alpha1_files_schema()),
    )
});

/// Read server status.
pub static SYSTEM_READ: Lazy<VersionRegistry> = Lazy::new(|| {
    VersionRegistry::new(ResourceKind::System, Operation::Read).register(
        VersionedCodec::new(ResourceKind::System, V1ALPHA1)
            .with_response(system::v1alpha1_status_schema()),
    )
});

/// Every registry in the table.
pub fn all() -> Vec<&'static VersionRegistry> {
    vec![
        &*CONFIG_CREATE,
        &*CONFIG_READ,
        &*CONFIG_UPDATE,
        &*TRIGGER_CREATE,
        &*TRIGGER_READ,
        &*TRIGGER_UPDATE,
        &*WORKFLOW_CREATE,
        &*WORKFLOW_READ,
        &*WORKFLOW_UPDATE,
        &*WORKFLOW_RUN_READ,
        &*METRICS_READ,
        &*PLUGIN_READ,
        &*PLUGIN_FILES_READ,
        &*SYSTEM_READ,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_registry_serves_v1alpha1_as_latest() {
        for registry in all() {
            let latest = registry.latest().unwrap();
            assert_eq!(latest.version(), V1ALPHA1, "{}", registry.kind());
            assert_eq!(latest.kind(), registry.kind());
            let content_type = registry.kind().content_type(V1ALPHA1);
            assert_eq!(latest.content_type(), content_type);
        }
    }

    #[test]
    fn only_write_operations_take_bodies() {
        for registry in all() {
            let takes_body = registry.latest().unwrap().accepts_body();
            assert_eq!(
                takes_body,
                registry.operation() != Operation::Read,
                "{} {}",
                registry.kind(),
                registry.operation()
            );
        }
    }

    #[test]
    fn plugin_files_content_type() {
        assert_eq!(
            PLUGIN_FILES_READ.latest().unwrap().content_type(),
            "application/vnd.flowdapt.ai.plugin_file.v1alpha1+json"
        );
    }
}
