//! Integration tests for flowdapt-client.
//!
//! These tests verify the client API surface without requiring a running
//! server. Requests go through an in-memory transport that records them.

use flowdapt_client::dto::configs::ConfigResponse;
use flowdapt_client::{
    Client, ClientConfig, ClientError, FlowdaptSdk, HttpRequest, HttpResponse, HttpTransport,
    TransportFuture,
};
use flowdapt_core::FlowdaptError;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Answers every request with the same status and JSON body.
struct RecordingTransport {
    status: u16,
    body: Value,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingTransport {
    fn new(status: u16, body: Value) -> Arc<Self> {
        Arc::new(Self {
            status,
            body,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpTransport for RecordingTransport {
    fn send<'a>(&'a self, request: HttpRequest) -> TransportFuture<'a, HttpResponse> {
        Box::pin(async move {
            self.requests.lock().unwrap().push(request);
            let mut headers = HeaderMap::new();
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            Ok(HttpResponse::from_bytes(
                self.status,
                headers,
                serde_json::to_vec(&self.body).unwrap(),
            ))
        })
    }
}

fn sdk_with(transport: Arc<RecordingTransport>) -> FlowdaptSdk {
    FlowdaptSdk::with_transport(ClientConfig::new("http://flowdapt.test"), transport).unwrap()
}

fn config_body() -> Value {
    json!({
        "metadata": { "name": "cfg", "annotations": {} },
        "spec": {
            "selector": { "type": "name", "value": "train" },
            "data": { "lr": 0.01 }
        }
    })
}

#[test]
fn test_client_construction() {
    // Valid URL
    let client = Client::new("http://localhost:8080");
    assert!(client.is_ok());

    // HTTPS URL
    let client = Client::new("https://api.example.com");
    assert!(client.is_ok());
}

#[test]
fn test_client_invalid_url() {
    // Missing protocol
    let result = Client::new("localhost:8080");
    assert!(result.is_err());

    match result {
        Err(ClientError::InvalidUrl(msg)) => {
            assert!(msg.contains("http"));
        }
        other => panic!("Expected InvalidUrl error, got {other:?}"),
    }
}

#[test]
fn test_client_builder_pattern() {
    let client = Client::new("http://localhost:8080")
        .unwrap()
        .with_api_key("my-secret-key")
        .with_timeout(Duration::from_secs(60));

    assert!(client.is_ok());
}

#[test]
fn test_zero_timeout_is_rejected() {
    let result = Client::new("http://localhost:8080")
        .unwrap()
        .with_timeout(Duration::ZERO);
    assert!(matches!(result, Err(ClientError::Config(_))));
}

#[tokio::test]
async fn test_invalid_body_never_reaches_transport() {
    let transport = RecordingTransport::new(200, json!({}));
    let sdk = sdk_with(transport.clone());

    let result = sdk
        .configs
        .create_config(json!({ "metadata": {}, "spec": {} }), None)
        .await;

    let err = result.unwrap_err();
    let violations = err
        .as_schema_error()
        .and_then(FlowdaptError::violations)
        .expect("Expected a schema validation error");
    assert!(violations.iter().any(|v| v.path == "metadata.name"));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_unknown_version_never_reaches_transport() {
    let transport = RecordingTransport::new(200, json!({}));
    let sdk = sdk_with(transport.clone());

    let err = sdk.configs.get_config("cfg", Some("v9")).await.unwrap_err();

    assert!(err.as_schema_error().unwrap().is_unsupported_version());
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_dot_and_empty_identifiers_never_reach_transport() {
    let transport = RecordingTransport::new(200, config_body());
    let sdk = sdk_with(transport.clone());

    let results = [
        sdk.configs.delete_config("..", None).await.map(|_| ()),
        sdk.configs.delete_config("", None).await.map(|_| ()),
        sdk.workflows.get_workflow_run(".", None).await.map(|_| ()),
        sdk.plugins.download_plugin_file("p", ".").await.map(|_| ()),
    ];

    for result in results {
        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
    }
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_timeout_keeps_custom_transport() {
    let transport = RecordingTransport::new(200, json!({ "status": "ok" }));
    let config = ClientConfig::new("http://flowdapt.test");
    let client = Client::with_transport(config, transport.clone())
        .unwrap()
        .with_timeout(Duration::from_secs(5))
        .unwrap();
    assert_eq!(client.config().timeout, Duration::from_secs(5));

    let sdk = FlowdaptSdk::from_client(client);
    assert_eq!(sdk.ping().await.unwrap(), json!({ "status": "ok" }));
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_download_skips_version_negotiation() {
    let transport = RecordingTransport::new(200, json!({}));
    let sdk = sdk_with(transport.clone());

    let _stream = sdk
        .plugins
        .download_plugin_file("p", "data/model.bin")
        .await
        .unwrap();

    let request = &transport.requests()[0];
    assert_eq!(
        request.url.as_str(),
        "http://flowdapt.test/plugin/p/files/data%2Fmodel.bin"
    );
    assert_eq!(request.headers["accept"], "application/octet-stream; q=1");
    assert!(request.headers.get("x-flowdapt-api-version").is_none());
}

#[tokio::test]
async fn test_run_workflow_input_skips_validation() {
    let run = json!({
        "uid": "0b0f8a52-7e4f-4c59-9a34-3a0f3b9c2d11",
        "name": "train-run-1",
        "workflow": "train",
        "started_at": "2024-03-01T12:00:00Z",
        "state": "pending"
    });
    let transport = RecordingTransport::new(200, run);
    let sdk = sdk_with(transport.clone());

    let options = flowdapt_client::RunWorkflowOptions::default()
        .with_input(json!([1, 2, 3]))
        .no_wait();
    sdk.workflows.run_workflow("train", options).await.unwrap();

    let request = &transport.requests()[0];
    assert_eq!(
        request.url.as_str(),
        "http://flowdapt.test/workflows/train/run?wait=false"
    );
    let sent: Value = serde_json::from_slice(request.body.as_ref().unwrap()).unwrap();
    assert_eq!(sent, json!([1, 2, 3]));
    assert_eq!(
        request.headers["x-flowdapt-api-version"],
        "workflow_run.v1alpha1"
    );
}

#[tokio::test]
async fn test_create_sends_normalized_body_and_headers() {
    let mut echo = config_body();
    echo["kind"] = json!("config");
    echo["metadata"]["uid"] = json!("0b0f8a52-7e4f-4c59-9a34-3a0f3b9c2d11");
    echo["metadata"]["created_at"] = json!("2024-03-01 12:00:00");
    let transport = RecordingTransport::new(200, echo);
    let sdk = sdk_with(transport.clone());

    let ConfigResponse::V1Alpha1(config) = sdk
        .configs
        .create_config(config_body(), None)
        .await
        .unwrap();
    assert_eq!(config.metadata.name, "cfg");
    assert_eq!(
        config.metadata.created_at.unwrap().to_rfc3339(),
        "2024-03-01T12:00:00+00:00"
    );

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, reqwest::Method::POST);
    assert_eq!(request.url.as_str(), "http://flowdapt.test/configs/");
    assert_eq!(
        request.headers["accept"],
        "application/vnd.flowdapt.ai.config.v1alpha1+json; q=1"
    );
    assert_eq!(request.headers["x-flowdapt-api-version"], "config.v1alpha1");
    assert_eq!(request.headers["content-type"], "application/json");
    assert!(request.headers["user-agent"]
        .to_str()
        .unwrap()
        .starts_with("flowdapt-rust-sdk/"));

    let sent: Value = serde_json::from_slice(request.body.as_ref().unwrap()).unwrap();
    assert_eq!(sent["kind"], json!("config"));
    assert_eq!(sent["spec"]["data"], json!({ "lr": 0.01 }));
}

#[tokio::test]
async fn test_invalid_response_is_a_schema_error() {
    let transport = RecordingTransport::new(200, json!({ "metadata": { "name": 5 } }));
    let sdk = sdk_with(transport);

    let err = sdk.configs.get_config("cfg", None).await.unwrap_err();
    let schema_error = err.as_schema_error().expect("Expected a schema error");
    assert!(schema_error
        .violations()
        .unwrap()
        .iter()
        .any(|v| v.path == "metadata.name"));
}

#[tokio::test]
async fn test_api_key_is_sent_as_bearer() {
    let transport = RecordingTransport::new(200, json!({ "files": [] }));
    let config = ClientConfig::new("http://flowdapt.test").with_api_key("secret");
    let sdk = FlowdaptSdk::with_transport(config, transport.clone()).unwrap();

    sdk.plugins.list_plugin_files("p", None).await.unwrap();

    let request = &transport.requests()[0];
    assert_eq!(request.headers["authorization"], "Bearer secret");
    assert_eq!(
        request.headers["x-flowdapt-api-version"],
        "plugin.files.v1alpha1"
    );
    assert!(request.body.is_none());
}
