//! Trigger rule operations.

use crate::client::{path_id, ApiRequest, Client};
use crate::error::Result;
use flowdapt_core::descriptors::{TRIGGER_CREATE, TRIGGER_READ, TRIGGER_UPDATE};
use flowdapt_core::dto::triggers::TriggerRuleResponse;
use flowdapt_core::{IntoRequestBody, RequestBinder};
use reqwest::Method;

/// API for trigger rule resources.
#[derive(Debug, Clone)]
pub struct TriggersApi {
    client: Client,
}

impl TriggersApi {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a trigger rule.
    ///
    /// # Errors
    ///
    /// Returns an error if the body fails validation, the version is not
    /// supported, or the server rejects the request.
    pub async fn create_trigger(
        &self,
        request: impl IntoRequestBody,
        version: Option<&str>,
    ) -> Result<TriggerRuleResponse> {
        let body = request.into_request_body()?;
        let bound = RequestBinder::bind(&TRIGGER_CREATE, Some(body), version)?;
        let request = ApiRequest::new(Method::POST, &["triggers", ""]);
        self.client.call(request, &bound).await
    }

    /// Get a trigger rule by name or uid.
    pub async fn get_trigger(
        &self,
        identifier: &str,
        version: Option<&str>,
    ) -> Result<TriggerRuleResponse> {
        let bound = RequestBinder::bind(&TRIGGER_READ, None, version)?;
        let identifier = path_id("trigger rule", identifier)?;
        let request = ApiRequest::new(Method::GET, &["triggers", identifier]);
        self.client.call(request, &bound).await
    }

    /// List all trigger rules.
    pub async fn list_triggers(&self, version: Option<&str>) -> Result<Vec<TriggerRuleResponse>> {
        let bound = RequestBinder::bind(&TRIGGER_READ, None, version)?;
        let request = ApiRequest::new(Method::GET, &["triggers", ""]);
        self.client.call_list(request, &bound).await
    }

    /// Replace a trigger rule.
    pub async fn update_trigger(
        &self,
        identifier: &str,
        request: impl IntoRequestBody,
        version: Option<&str>,
    ) -> Result<TriggerRuleResponse> {
        let body = request.into_request_body()?;
        let bound = RequestBinder::bind(&TRIGGER_UPDATE, Some(body), version)?;
        let identifier = path_id("trigger rule", identifier)?;
        let request = ApiRequest::new(Method::PUT, &["triggers", identifier]);
        self.client.call(request, &bound).await
    }

    /// Delete a trigger rule, returning the deleted resource.
    pub async fn delete_trigger(
        &self,
        identifier: &str,
        version: Option<&str>,
    ) -> Result<TriggerRuleResponse> {
        let bound = RequestBinder::bind(&TRIGGER_READ, None, version)?;
        let identifier = path_id("trigger rule", identifier)?;
        let request = ApiRequest::new(Method::DELETE, &["triggers", identifier]);
        self.client.call(request, &bound).await
    }
}
