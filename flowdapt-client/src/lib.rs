//! Typed Rust client for the Flowdapt workflow orchestration API.
//!
//! Every request body is validated against the schema of the negotiated
//! version before it is sent, and every response is validated and
//! normalized before it is handed back, using the codecs and registries of
//! `flowdapt-core`.
//!
//! # Features
//!
//! - Config, trigger rule and workflow CRUD
//! - Workflow runs (start, list, inspect, delete)
//! - Server status, metrics and plugin listing
//! - Streaming plugin file download
//! - Per-call version selection with content negotiation
//! - Pluggable HTTP transport
//!
//! # Example
//!
//! ```no_run
//! use flowdapt_client::{FlowdaptSdk, RunWorkflowOptions};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let sdk = FlowdaptSdk::new("http://localhost:8080")?;
//!
//! // Create a workflow from raw JSON, pinned to a schema version
//! let workflow = json!({
//!     "__version": "v1alpha1",
//!     "metadata": { "name": "train", "annotations": {} },
//!     "spec": { "stages": [{ "name": "fit", "target": "models.fit" }] }
//! });
//! sdk.workflows.create_workflow(workflow, None).await?;
//!
//! // Run it and wait for the result
//! let run = sdk
//!     .workflows
//!     .run_workflow("train", RunWorkflowOptions::default())
//!     .await?;
//! println!("{:?}", run);
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All operations return `Result<T, ClientError>`:
//!
//! ```no_run
//! # use flowdapt_client::{ClientError, FlowdaptSdk};
//! # async fn example() -> Result<(), ClientError> {
//! # let sdk = FlowdaptSdk::new("http://localhost:8080")?;
//! match sdk.configs.get_config("missing", None).await {
//!     Ok(config) => println!("Found: {:?}", config),
//!     Err(ClientError::Api { status: 404, .. }) => println!("Config not found"),
//!     Err(e) if e.as_schema_error().is_some() => println!("Contract error: {}", e),
//!     Err(e) => println!("Error: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod client;
mod config;
mod configs;
mod error;
mod metrics;
mod plugins;
mod sdk;
mod system;
mod transport;
mod triggers;
mod workflows;

// Re-export the main types
pub use client::Client;
pub use config::{
    default_user_agent, ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, ENV_API_KEY,
    ENV_BASE_URL, ENV_TIMEOUT_SECS, ENV_USER_AGENT,
};
pub use configs::ConfigsApi;
pub use error::{ClientError, Result};
pub use metrics::{MetricsApi, MetricsQuery};
pub use plugins::PluginsApi;
pub use sdk::FlowdaptSdk;
pub use system::SystemApi;
pub use transport::{
    ByteStream, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportFuture,
};
pub use triggers::TriggersApi;
pub use workflows::{RunWorkflowOptions, WorkflowsApi, DEFAULT_RUN_LIMIT};

pub use flowdapt_core::dto;
