//! Version registries.
//!
//! One registry exists per (resource kind, operation) pair. Versions are
//! kept in declaration order; the last declared version is the latest.

use crate::codec::VersionedCodec;
use crate::error::{FlowdaptError, Result};
use crate::negotiation::{Operation, ResourceKind};
use std::collections::HashMap;

/// Ordered mapping from schema version to codec.
///
/// Backed by a list (declaration order) plus a name index, so "latest"
/// never depends on map iteration order.
#[derive(Debug, Clone)]
pub struct VersionRegistry {
    kind: ResourceKind,
    operation: Operation,
    codecs: Vec<VersionedCodec>,
    index: HashMap<String, usize>,
}

impl VersionRegistry {
    /// Create an empty registry.
    pub fn new(kind: ResourceKind, operation: Operation) -> Self {
        Self {
            kind,
            operation,
            codecs: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Append a codec.
    ///
    /// Registering a version that already exists replaces its codec in
    /// place without changing precedence.
    pub fn register(mut self, codec: VersionedCodec) -> Self {
        match self.index.get(codec.version()) {
            Some(&idx) => self.codecs[idx] = codec,
            None => {
                self.index
                    .insert(codec.version().to_string(), self.codecs.len());
                self.codecs.push(codec);
            }
        }
        self
    }

    /// Resource kind served by this registry.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Operation served by this registry.
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Get the codec for a version.
    pub fn get(&self, version: &str) -> Option<&VersionedCodec> {
        self.index.get(version).map(|&idx| &self.codecs[idx])
    }

    /// Check if a version is registered.
    pub fn contains(&self, version: &str) -> bool {
        self.index.contains_key(version)
    }

    /// The last declared codec.
    pub fn latest(&self) -> Option<&VersionedCodec> {
        self.codecs.last()
    }

    /// All versions in declaration order.
    pub fn versions(&self) -> Vec<&str> {
        self.codecs.iter().map(VersionedCodec::version).collect()
    }

    /// Number of registered versions.
    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    /// Whether no version is registered.
    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }

    /// Resolve a codec from an optional explicit version.
    ///
    /// # Errors
    ///
    /// Returns [`FlowdaptError::UnsupportedVersion`] if the version is not
    /// registered, or if the registry is empty.
    pub fn resolve(&self, explicit: Option<&str>) -> Result<&VersionedCodec> {
        self.resolve_with(explicit, None)
    }

    /// Resolve a codec.
    ///
    /// Precedence: the explicit version, then the version declared by the
    /// payload, then the latest version.
    pub fn resolve_with(
        &self,
        explicit: Option<&str>,
        declared: Option<&str>,
    ) -> Result<&VersionedCodec> {
        match explicit.or(declared) {
            Some(version) => self
                .get(version)
                .ok_or_else(|| self.unsupported(version)),
            None => self.latest().ok_or_else(|| self.unsupported("latest")),
        }
    }

    fn unsupported(&self, version: &str) -> FlowdaptError {
        FlowdaptError::UnsupportedVersion {
            kind: self.kind.to_string(),
            operation: self.operation.to_string(),
            version: version.to_string(),
            available: self.versions().into_iter().map(String::from).collect(),
        }
    }
}
