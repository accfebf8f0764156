//! Entry point bundling every resource API.

use crate::client::{ApiRequest, Client};
use crate::config::ClientConfig;
use crate::configs::ConfigsApi;
use crate::error::Result;
use crate::metrics::MetricsApi;
use crate::plugins::PluginsApi;
use crate::system::SystemApi;
use crate::transport::HttpTransport;
use crate::triggers::TriggersApi;
use crate::workflows::WorkflowsApi;
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;

/// Flowdapt SDK.
///
/// All resource APIs share one [`Client`].
///
/// # Example
///
/// ```no_run
/// use flowdapt_client::{ClientConfig, FlowdaptSdk};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let sdk = FlowdaptSdk::from_config(ClientConfig::from_env()?)?;
/// println!("{}", sdk.ping().await?);
///
/// for config in sdk.configs.list_configs(None).await? {
///     println!("{:?}", config);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FlowdaptSdk {
    client: Client,
    /// Config resources.
    pub configs: ConfigsApi,
    /// Trigger rules.
    pub triggers: TriggersApi,
    /// Workflows and workflow runs.
    pub workflows: WorkflowsApi,
    /// Server status.
    pub system: SystemApi,
    /// Server metrics.
    pub metrics: MetricsApi,
    /// Installed plugins.
    pub plugins: PluginsApi,
}

impl FlowdaptSdk {
    /// Create an SDK for `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be
    /// created.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Client::new(base_url).map(Self::from_client)
    }

    /// Create an SDK from a configuration.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        Client::from_config(config).map(Self::from_client)
    }

    /// Create an SDK that sends requests through `transport`.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        Client::with_transport(config, transport).map(Self::from_client)
    }

    /// Create an SDK around an existing client.
    pub fn from_client(client: Client) -> Self {
        Self {
            configs: ConfigsApi::new(client.clone()),
            triggers: TriggersApi::new(client.clone()),
            workflows: WorkflowsApi::new(client.clone()),
            system: SystemApi::new(client.clone()),
            metrics: MetricsApi::new(client.clone()),
            plugins: PluginsApi::new(client.clone()),
            client,
        }
    }

    /// The shared client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Check that the server is reachable.
    ///
    /// Returns the body of `GET /`: parsed JSON when the server declares
    /// JSON, the raw text otherwise.
    pub async fn ping(&self) -> Result<Value> {
        let response = self
            .client
            .execute(ApiRequest::new(Method::GET, &[""]))
            .await?;
        response.content().await
    }
}
