//! Config resource operations.

use crate::client::{path_id, ApiRequest, Client};
use crate::error::Result;
use flowdapt_core::descriptors::{CONFIG_CREATE, CONFIG_READ, CONFIG_UPDATE};
use flowdapt_core::dto::configs::ConfigResponse;
use flowdapt_core::{IntoRequestBody, RequestBinder};
use reqwest::Method;

/// API for config resources.
#[derive(Debug, Clone)]
pub struct ConfigsApi {
    client: Client,
}

impl ConfigsApi {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a config.
    ///
    /// # Arguments
    ///
    /// * `request` - A config DTO, or raw JSON (optionally carrying a
    ///   `"__version"` marker)
    /// * `version` - Schema version; defaults to the body's version, then
    ///   the latest
    ///
    /// # Errors
    ///
    /// Returns an error if the body fails validation, the version is not
    /// supported, or the server rejects the request.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use flowdapt_client::FlowdaptSdk;
    /// use flowdapt_core::dto::base::V1Alpha1ResourceMetadata;
    /// use flowdapt_core::dto::configs::{
    ///     ConfigResponse, V1Alpha1ConfigResource, V1Alpha1ConfigResourceSpec,
    ///     V1Alpha1ConfigSelector,
    /// };
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let sdk = FlowdaptSdk::new("http://localhost:8080")?;
    /// let request = V1Alpha1ConfigResource::new(
    ///     V1Alpha1ResourceMetadata::named("train-config"),
    ///     V1Alpha1ConfigResourceSpec {
    ///         selector: V1Alpha1ConfigSelector::by_name("train"),
    ///         data: Default::default(),
    ///     },
    /// );
    ///
    /// let ConfigResponse::V1Alpha1(config) = sdk.configs.create_config(request, None).await?;
    /// println!("Created {:?}", config.metadata.uid);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_config(
        &self,
        request: impl IntoRequestBody,
        version: Option<&str>,
    ) -> Result<ConfigResponse> {
        let body = request.into_request_body()?;
        let bound = RequestBinder::bind(&CONFIG_CREATE, Some(body), version)?;
        let request = ApiRequest::new(Method::POST, &["configs", ""]);
        self.client.call(request, &bound).await
    }

    /// Get a config by name or uid.
    pub async fn get_config(
        &self,
        identifier: &str,
        version: Option<&str>,
    ) -> Result<ConfigResponse> {
        let bound = RequestBinder::bind(&CONFIG_READ, None, version)?;
        let identifier = path_id("config", identifier)?;
        let request = ApiRequest::new(Method::GET, &["configs", identifier]);
        self.client.call(request, &bound).await
    }

    /// List all configs.
    pub async fn list_configs(&self, version: Option<&str>) -> Result<Vec<ConfigResponse>> {
        let bound = RequestBinder::bind(&CONFIG_READ, None, version)?;
        let request = ApiRequest::new(Method::GET, &["configs", ""]);
        self.client.call_list(request, &bound).await
    }

    /// Replace a config.
    ///
    /// # Errors
    ///
    /// Returns an error if the body fails validation, the version is not
    /// supported, or the server rejects the request.
    pub async fn update_config(
        &self,
        identifier: &str,
        request: impl IntoRequestBody,
        version: Option<&str>,
    ) -> Result<ConfigResponse> {
        let body = request.into_request_body()?;
        let bound = RequestBinder::bind(&CONFIG_UPDATE, Some(body), version)?;
        let identifier = path_id("config", identifier)?;
        let request = ApiRequest::new(Method::PUT, &["configs", identifier]);
        self.client.call(request, &bound).await
    }

    /// Delete a config, returning the deleted resource.
    pub async fn delete_config(
        &self,
        identifier: &str,
        version: Option<&str>,
    ) -> Result<ConfigResponse> {
        let bound = RequestBinder::bind(&CONFIG_READ, None, version)?;
        let identifier = path_id("config", identifier)?;
        let request = ApiRequest::new(Method::DELETE, &["configs", identifier]);
        self.client.call(request, &bound).await
    }
}
