//! Flowdapt Core Library
//!
//! This crate provides the versioned data-transfer pipeline shared by every
//! Flowdapt client: wire schemas, codecs, version registries, request
//! binding, content negotiation and the resource DTOs.
//!
//! # Overview
//!
//! Every API operation is bound to a schema version before any I/O
//! happens. Outgoing bodies are validated against the version's request
//! schema; responses are validated, defaulted and normalized against its
//! response schema before they are mapped onto Rust types.
//!
//! # Key Components
//!
//! - **Schema**: Declarative wire schemas and the [`SchemaValidator`]
//! - **Codec**: [`VersionedCodec`] binds one version to its schemas
//! - **Registry**: [`VersionRegistry`] orders the versions of one operation
//! - **Binder**: [`RequestBinder`] resolves, validates and encodes
//! - **Negotiation**: `Accept` and version header construction
//! - **Descriptors**: the static registry table for every resource
//!
//! # Example
//!
//! ```
//! use flowdapt_core::descriptors::CONFIG_CREATE;
//! use flowdapt_core::RequestBinder;
//! use serde_json::json;
//!
//! let bound = RequestBinder::bind(
//!     &CONFIG_CREATE,
//!     Some(json!({
//!         "metadata": { "name": "train-config", "annotations": {} },
//!         "spec": { "selector": { "type": "name", "value": "train" }, "data": {} }
//!     }).into()),
//!     None,
//! ).unwrap();
//!
//! assert_eq!(bound.version, "v1alpha1");
//! assert_eq!(bound.version_header().unwrap(), "config.v1alpha1");
//! assert_eq!(bound.body.unwrap()["kind"], "config");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod binder;
pub mod codec;
pub mod descriptors;
pub mod dto;
pub mod error;
pub mod negotiation;
pub mod prelude;
pub mod registry;
pub mod schema;

// Re-export key types at crate root for convenience
pub use binder::{
    BoundRequest, IntoRequestBody, RequestBinder, RequestBody, ResponseDecoder, VersionedDto,
};
pub use codec::{FromEnvelope, TypedEnvelope, VersionedCodec};
pub use error::{FlowdaptError, Result, Violation, Violations};
pub use negotiation::{Operation, ResourceKind};
pub use registry::VersionRegistry;
pub use schema::{Schema, SchemaValidator};
