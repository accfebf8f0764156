//! Resource kinds, versioned media types and negotiation headers.

use crate::error::{FlowdaptError, Result};
use std::fmt;

/// Vendor tree used in every versioned media type.
pub const MEDIA_TYPE_ORG: &str = "flowdapt.ai";

/// Header carrying `<resource kind>.<version>` on every versioned request.
pub const VERSION_HEADER: &str = "X-Flowdapt-API-Version";

/// Media type negotiated for raw file downloads.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Plain JSON media type.
pub const APPLICATION_JSON: &str = "application/json";

/// A resource family exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Config resources.
    Config,
    /// Trigger rule resources.
    TriggerRule,
    /// Workflow definitions.
    Workflow,
    /// Workflow executions.
    WorkflowRun,
    /// Server metrics.
    Metrics,
    /// Installed plugins.
    Plugin,
    /// Files shipped with a plugin.
    PluginFiles,
    /// Server status.
    System,
}

impl ResourceKind {
    /// Identifier used in the version header.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::TriggerRule => "trigger_rule",
            Self::Workflow => "workflow",
            Self::WorkflowRun => "workflow_run",
            Self::Metrics => "metrics",
            Self::Plugin => "plugin",
            Self::PluginFiles => "plugin.files",
            Self::System => "system",
        }
    }

    /// Identifier used inside the versioned media type.
    ///
    /// Identical to [`as_str`](Self::as_str) except for plugin files,
    /// which the server names `plugin_file` in its media types.
    pub const fn media_name(&self) -> &'static str {
        match self {
            Self::PluginFiles => "plugin_file",
            other => other.as_str(),
        }
    }

    /// Versioned media type for this kind.
    pub fn content_type(&self, version: &str) -> String {
        versioned_content_type(self.media_name(), version)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An operation family; each has its own version registry because request
/// and response shapes differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// POST a new resource.
    Create,
    /// GET, list and DELETE, which share the read response shape.
    Read,
    /// PUT a replacement resource.
    Update,
}

impl Operation {
    /// Lowercase operation name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format `application/vnd.flowdapt.ai.<name>.<version>+json`.
pub fn versioned_content_type(media_name: &str, version: &str) -> String {
    format!(
        "application/vnd.{}.{}.{}+json",
        MEDIA_TYPE_ORG, media_name, version
    )
}

/// Build an `Accept` header entry: `"<type>; q=<quality>"`.
///
/// # Errors
///
/// Returns [`FlowdaptError::InvalidHeader`] if `content_type` is empty or
/// `quality` is outside `0.0..=1.0`.
pub fn build_accept_header(content_type: &str, quality: f32) -> Result<String> {
    if content_type.trim().is_empty() {
        return Err(FlowdaptError::InvalidHeader {
            header: "Accept".to_string(),
            cause: "content type is empty".to_string(),
        });
    }
    if !(0.0..=1.0).contains(&quality) {
        return Err(FlowdaptError::InvalidHeader {
            header: "Accept".to_string(),
            cause: format!("quality {} is outside 0..=1", quality),
        });
    }
    Ok(format!("{}; q={}", content_type, quality))
}

/// Build an `Accept` header from several weighted media types.
pub fn build_accept_list(entries: &[(&str, f32)]) -> Result<String> {
    entries
        .iter()
        .map(|(content_type, quality)| build_accept_header(content_type, *quality))
        .collect::<Result<Vec<_>>>()
        .map(|parts| parts.join(", "))
}

/// Build the version header value: `"<resource kind>.<version>"`.
///
/// # Errors
///
/// Returns [`FlowdaptError::InvalidHeader`] if either input is empty.
pub fn build_version_header(resource_kind: &str, version: &str) -> Result<String> {
    if resource_kind.is_empty() || version.is_empty() {
        return Err(FlowdaptError::InvalidHeader {
            header: VERSION_HEADER.to_string(),
            cause: format!(
                "resource kind and version must be non-empty (got '{}' and '{}')",
                resource_kind, version
            ),
        });
    }
    Ok(format!("{}.{}", resource_kind, version))
}

/// Whether a `Content-Type` value denotes a JSON body.
///
/// Matches `application/json` and any `<type>/<subtype>+json`, with or
/// without parameters, case-insensitively.
pub fn is_json_media_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if essence == APPLICATION_JSON {
        return true;
    }

    match essence.split_once('/') {
        Some((ty, subtype)) => {
            !ty.is_empty()
                && subtype.ends_with("+json")
                && subtype.len() > "+json".len()
                && !essence.contains(char::is_whitespace)
                && !subtype.contains('/')
        }
        None => false,
    }
}
