//! Installed plugins.

use crate::client::{path_id, ApiRequest, Client};
use crate::error::Result;
use crate::transport::ByteStream;
use flowdapt_core::descriptors::{PLUGIN_FILES_READ, PLUGIN_READ};
use flowdapt_core::dto::plugins::{PluginFilesResponse, PluginResponse};
use flowdapt_core::negotiation::{build_accept_header, OCTET_STREAM};
use flowdapt_core::RequestBinder;
use reqwest::Method;
use tracing::debug;

/// API for installed plugins.
#[derive(Debug, Clone)]
pub struct PluginsApi {
    client: Client,
}

impl PluginsApi {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Get a plugin by name.
    pub async fn get_plugin(&self, name: &str, version: Option<&str>) -> Result<PluginResponse> {
        let bound = RequestBinder::bind(&PLUGIN_READ, None, version)?;
        let name = path_id("plugin", name)?;
        let request = ApiRequest::new(Method::GET, &["plugin", name]);
        self.client.call(request, &bound).await
    }

    /// List installed plugins.
    pub async fn list_plugins(&self, version: Option<&str>) -> Result<Vec<PluginResponse>> {
        let bound = RequestBinder::bind(&PLUGIN_READ, None, version)?;
        let request = ApiRequest::new(Method::GET, &["plugin", ""]);
        self.client.call_list(request, &bound).await
    }

    /// List the files shipped with a plugin.
    pub async fn list_plugin_files(
        &self,
        name: &str,
        version: Option<&str>,
    ) -> Result<PluginFilesResponse> {
        let bound = RequestBinder::bind(&PLUGIN_FILES_READ, None, version)?;
        let name = path_id("plugin", name)?;
        let request = ApiRequest::new(Method::GET, &["plugin", name, "files"]);
        self.client.call(request, &bound).await
    }

    /// Download one plugin file as a byte stream.
    ///
    /// The file is not decoded; no version header is sent.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use flowdapt_client::FlowdaptSdk;
    /// use futures::TryStreamExt;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let sdk = FlowdaptSdk::new("http://localhost:8080")?;
    /// let mut stream = sdk
    ///     .plugins
    ///     .download_plugin_file("my-plugin", "workflows/train.yaml")
    ///     .await?;
    /// while let Some(chunk) = stream.try_next().await? {
    ///     println!("read {} bytes", chunk.len());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn download_plugin_file(&self, name: &str, file: &str) -> Result<ByteStream> {
        let name = path_id("plugin", name)?;
        let file = path_id("plugin file", file)?;
        let request = ApiRequest::new(Method::GET, &["plugin", name, "files", file])
            .accept(build_accept_header(OCTET_STREAM, 1.0)?);
        let response = self.client.execute(request).await?;
        debug!(plugin = name, file, "Streaming plugin file");
        Ok(response.body)
    }
}
