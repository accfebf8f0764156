//! Server status.

use crate::client::{ApiRequest, Client};
use crate::error::Result;
use flowdapt_core::descriptors::SYSTEM_READ;
use flowdapt_core::dto::system::SystemStatusResponse;
use flowdapt_core::RequestBinder;
use reqwest::Method;

/// API for server status.
#[derive(Debug, Clone)]
pub struct SystemApi {
    client: Client,
}

impl SystemApi {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Get the server's status: versions, host resources and services.
    pub async fn status(&self, version: Option<&str>) -> Result<SystemStatusResponse> {
        let bound = RequestBinder::bind(&SYSTEM_READ, None, version)?;
        let request = ApiRequest::new(Method::GET, &["status"]);
        self.client.call(request, &bound).await
    }
}
