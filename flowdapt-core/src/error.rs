//! Error types for the Flowdapt data-transfer pipeline.
//!
//! Every failure carries the context needed to act on it: the schema that
//! rejected a value and the path of each violation, or the versions a
//! registry actually supports.

use std::fmt;
use thiserror::Error;

/// The main error type for schema, codec and version resolution failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowdaptError {
    // =========================================================================
    // Schema Errors (E200-E209)
    // =========================================================================
    /// A value did not conform to its declared schema.
    #[error("E201: Schema validation failed for '{schema}':\n{violations}")]
    SchemaValidation {
        /// Name of the schema the value was validated against.
        schema: String,
        /// Every violation found, in document order.
        violations: Violations,
    },

    /// A validated value could not be mapped onto its Rust type.
    #[error("E202: Failed to map '{schema}' onto {target}: {cause}")]
    Deserialize {
        /// Name of the schema the value was validated against.
        schema: String,
        /// The Rust type that was requested.
        target: String,
        /// Reason reported by serde.
        cause: String,
    },

    // =========================================================================
    // Version Errors (E210-E219)
    // =========================================================================
    /// The requested schema version is not registered.
    #[error(
        "E210: Unsupported version '{version}' for {kind} {operation} (available: {})",
        available.join(", ")
    )]
    UnsupportedVersion {
        /// Resource kind of the registry.
        kind: String,
        /// Operation of the registry.
        operation: String,
        /// The version that was requested.
        version: String,
        /// Versions the registry supports, in declaration order.
        available: Vec<String>,
    },

    // =========================================================================
    // Operation Errors (E220-E229)
    // =========================================================================
    /// The caller supplied a body to a read-only operation, or omitted the
    /// body of a write operation.
    #[error("E220: Invalid operation {operation}: {cause}")]
    InvalidOperation {
        /// The operation that was misused.
        operation: String,
        /// What was wrong with the call.
        cause: String,
    },

    // =========================================================================
    // Negotiation Errors (E230-E239)
    // =========================================================================
    /// A negotiation header could not be built from its inputs.
    #[error("E230: Cannot build header {header}: {cause}")]
    InvalidHeader {
        /// Header being built.
        header: String,
        /// What was wrong with the inputs.
        cause: String,
    },
}

impl FlowdaptError {
    /// Create a schema validation error from a list of violations.
    pub fn validation(schema: impl Into<String>, violations: Vec<Violation>) -> Self {
        Self::SchemaValidation {
            schema: schema.into(),
            violations: Violations(violations),
        }
    }

    /// Create an invalid operation error.
    pub fn invalid_operation(operation: impl Into<String>, cause: impl Into<String>) -> Self {
        Self::InvalidOperation {
            operation: operation.into(),
            cause: cause.into(),
        }
    }

    /// Violations carried by a schema validation error.
    pub fn violations(&self) -> Option<&[Violation]> {
        match self {
            Self::SchemaValidation { violations, .. } => Some(&violations.0),
            _ => None,
        }
    }

    /// Whether this error reports an unregistered version.
    pub fn is_unsupported_version(&self) -> bool {
        matches!(self, Self::UnsupportedVersion { .. })
    }

    /// Whether this error reports a misused operation.
    pub fn is_invalid_operation(&self) -> bool {
        matches!(self, Self::InvalidOperation { .. })
    }
}

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dotted path of the offending field (`metadata.name`, `spec.stages[0]`).
    /// Empty for the document root.
    pub path: String,
    /// What the schema expected at this path.
    pub expected: String,
    /// Short rendering of what was found.
    pub actual: String,
}

impl Violation {
    /// Create a new violation.
    pub fn new(
        path: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() {
            "<root>"
        } else {
            &self.path
        };
        write!(
            f,
            "{}: expected {}, got {}",
            path, self.expected, self.actual
        )
    }
}

/// Ordered list of violations, displayed one per line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Violations(pub Vec<Violation>);

impl Violations {
    /// Number of violations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no violations.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the violations.
    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    /// Whether any violation points at `path`.
    pub fn contains_path(&self, path: &str) -> bool {
        self.0.iter().any(|v| v.path == path)
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, violation) in self.0.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "  - {}", violation)?;
        }
        Ok(())
    }
}

/// Result type alias for Flowdapt core operations.
pub type Result<T> = std::result::Result<T, FlowdaptError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_lists_every_violation() {
        let err = FlowdaptError::validation(
            "ResourceMetadata",
            vec![
                Violation::new("name", "string", "number 123"),
                Violation::new("annotations", "object", "missing"),
            ],
        );

        let msg = err.to_string();
        assert!(msg.contains("E201"));
        assert!(msg.contains("name: expected string, got number 123"));
        assert!(msg.contains("annotations: expected object, got missing"));
        assert_eq!(err.violations().map(<[Violation]>::len), Some(2));
    }

    #[test]
    fn unsupported_version_names_available_versions() {
        let err = FlowdaptError::UnsupportedVersion {
            kind: "config".into(),
            operation: "create".into(),
            version: "v3".into(),
            available: vec!["v1".into(), "v2".into()],
        };

        let msg = err.to_string();
        assert!(msg.contains("'v3'"));
        assert!(msg.contains("v1, v2"));
        assert!(err.is_unsupported_version());
        assert!(!err.is_invalid_operation());
    }

    #[test]
    fn root_violation_display() {
        let v = Violation::new("", "object", "string \"x\"");
        assert_eq!(v.to_string(), "<root>: expected object, got string \"x\"");
    }
}
