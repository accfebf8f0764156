//! Workflow and workflow run operations.

use crate::client::{path_id, ApiRequest, Client};
use crate::error::Result;
use flowdapt_core::descriptors::{
    WORKFLOW_CREATE, WORKFLOW_READ, WORKFLOW_RUN_READ, WORKFLOW_UPDATE,
};
use flowdapt_core::dto::workflows::{WorkflowResponse, WorkflowRunResponse};
use flowdapt_core::{IntoRequestBody, RequestBinder};
use reqwest::Method;
use serde_json::Value;

/// Number of runs returned by [`WorkflowsApi::list_workflow_runs`] when no
/// limit is given.
pub const DEFAULT_RUN_LIMIT: u32 = 10;

/// Options for [`WorkflowsApi::run_workflow`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunWorkflowOptions {
    /// Input passed to the workflow's first stages.
    pub input: Value,
    /// Whether the server should answer only once the run has stopped.
    pub wait: bool,
    /// Executor namespace to run in.
    pub namespace: Option<String>,
    /// Schema version of the returned run.
    pub version: Option<String>,
}

impl Default for RunWorkflowOptions {
    fn default() -> Self {
        Self {
            input: Value::Object(Default::default()),
            wait: true,
            namespace: None,
            version: None,
        }
    }
}

impl RunWorkflowOptions {
    /// Set the workflow input.
    #[must_use]
    pub fn with_input(mut self, input: Value) -> Self {
        self.input = input;
        self
    }

    /// Return as soon as the run is accepted.
    #[must_use]
    pub fn no_wait(mut self) -> Self {
        self.wait = false;
        self
    }

    /// Run in a specific namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Decode the run with a specific schema version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// API for workflows and their runs.
#[derive(Debug, Clone)]
pub struct WorkflowsApi {
    client: Client,
}

impl WorkflowsApi {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a workflow.
    ///
    /// # Errors
    ///
    /// Returns an error if the body fails validation, the version is not
    /// supported, or the server rejects the request.
    pub async fn create_workflow(
        &self,
        request: impl IntoRequestBody,
        version: Option<&str>,
    ) -> Result<WorkflowResponse> {
        let body = request.into_request_body()?;
        let bound = RequestBinder::bind(&WORKFLOW_CREATE, Some(body), version)?;
        let request = ApiRequest::new(Method::POST, &["workflows", ""]);
        self.client.call(request, &bound).await
    }

    /// Get a workflow by name or uid.
    pub async fn get_workflow(
        &self,
        identifier: &str,
        version: Option<&str>,
    ) -> Result<WorkflowResponse> {
        let bound = RequestBinder::bind(&WORKFLOW_READ, None, version)?;
        let identifier = path_id("workflow", identifier)?;
        let request = ApiRequest::new(Method::GET, &["workflows", identifier]);
        self.client.call(request, &bound).await
    }

    /// List all workflows.
    pub async fn list_workflows(&self, version: Option<&str>) -> Result<Vec<WorkflowResponse>> {
        let bound = RequestBinder::bind(&WORKFLOW_READ, None, version)?;
        let request = ApiRequest::new(Method::GET, &["workflows", ""]);
        self.client.call_list(request, &bound).await
    }

    /// Replace a workflow.
    pub async fn update_workflow(
        &self,
        identifier: &str,
        request: impl IntoRequestBody,
        version: Option<&str>,
    ) -> Result<WorkflowResponse> {
        let body = request.into_request_body()?;
        let bound = RequestBinder::bind(&WORKFLOW_UPDATE, Some(body), version)?;
        let identifier = path_id("workflow", identifier)?;
        let request = ApiRequest::new(Method::PUT, &["workflows", identifier]);
        self.client.call(request, &bound).await
    }

    /// Delete a workflow, returning the deleted resource.
    pub async fn delete_workflow(
        &self,
        identifier: &str,
        version: Option<&str>,
    ) -> Result<WorkflowResponse> {
        let bound = RequestBinder::bind(&WORKFLOW_READ, None, version)?;
        let identifier = path_id("workflow", identifier)?;
        let request = ApiRequest::new(Method::DELETE, &["workflows", identifier]);
        self.client.call(request, &bound).await
    }

    /// Run a workflow.
    ///
    /// The input is free-form JSON and is sent without schema validation.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use flowdapt_client::{FlowdaptSdk, RunWorkflowOptions};
    /// use flowdapt_core::dto::workflows::WorkflowRunResponse;
    /// use serde_json::json;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let sdk = FlowdaptSdk::new("http://localhost:8080")?;
    /// let options = RunWorkflowOptions::default().with_input(json!({ "epochs": 3 }));
    /// let WorkflowRunResponse::V1Alpha1(run) =
    ///     sdk.workflows.run_workflow("train", options).await?;
    /// println!("{} finished as {:?}", run.name, run.state);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run_workflow(
        &self,
        identifier: &str,
        options: RunWorkflowOptions,
    ) -> Result<WorkflowRunResponse> {
        let bound = RequestBinder::bind(&WORKFLOW_RUN_READ, None, options.version.as_deref())?;

        let identifier = path_id("workflow", identifier)?;

        let mut request = ApiRequest::new(Method::POST, &["workflows", identifier, "run"])
            .bound(&bound)?
            .json(options.input)
            .query("wait", options.wait.to_string());
        if let Some(namespace) = options.namespace {
            request = request.query("namespace", namespace);
        }

        let wire = self.client.fetch_json(request).await?;
        Ok(bound.decoder.decode_as(&wire)?)
    }

    /// List the most recent runs of a workflow.
    ///
    /// `limit` defaults to [`DEFAULT_RUN_LIMIT`].
    pub async fn list_workflow_runs(
        &self,
        identifier: &str,
        limit: Option<u32>,
        version: Option<&str>,
    ) -> Result<Vec<WorkflowRunResponse>> {
        let bound = RequestBinder::bind(&WORKFLOW_RUN_READ, None, version)?;
        let identifier = path_id("workflow", identifier)?;
        let request = ApiRequest::new(Method::GET, &["workflows", identifier, "run"])
            .query("limit", limit.unwrap_or(DEFAULT_RUN_LIMIT).to_string());
        self.client.call_list(request, &bound).await
    }

    /// Get a workflow run by name or uid.
    pub async fn get_workflow_run(
        &self,
        identifier: &str,
        version: Option<&str>,
    ) -> Result<WorkflowRunResponse> {
        let bound = RequestBinder::bind(&WORKFLOW_RUN_READ, None, version)?;
        let identifier = path_id("workflow run", identifier)?;
        let request = ApiRequest::new(Method::GET, &["workflows", "run", identifier]);
        self.client.call(request, &bound).await
    }

    /// Delete a workflow run, returning the deleted run.
    pub async fn delete_workflow_run(
        &self,
        identifier: &str,
        version: Option<&str>,
    ) -> Result<WorkflowRunResponse> {
        let bound = RequestBinder::bind(&WORKFLOW_RUN_READ, None, version)?;
        let identifier = path_id("workflow run", identifier)?;
        let request = ApiRequest::new(Method::DELETE, &["workflows", "run", identifier]);
        self.client.call(request, &bound).await
    }
}
