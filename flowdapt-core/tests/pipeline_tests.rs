//! Integration tests for the versioned request/response pipeline.
//!
//! These tests exercise codecs, registries and the binder together, the
//! way a client uses them for one API call.

use flowdapt_core::descriptors::{CONFIG_CREATE, CONFIG_READ, WORKFLOW_CREATE};
use flowdapt_core::dto::base::V1Alpha1ResourceMetadata;
use flowdapt_core::dto::configs::{
    ConfigResponse, V1Alpha1ConfigResource, V1Alpha1ConfigResourceSpec, V1Alpha1ConfigSelector,
};
use flowdapt_core::negotiation::{build_accept_header, build_version_header};
use flowdapt_core::schema::{Field, ObjectSchema};
use flowdapt_core::{
    FlowdaptError, IntoRequestBody, Operation, RequestBinder, ResourceKind, Schema,
    SchemaValidator, VersionRegistry, VersionedCodec,
};
use serde_json::{json, Map, Value};

fn two_version_registry() -> VersionRegistry {
    let schema = Schema::object(
        ObjectSchema::new("Thing").field(Field::required("name", Schema::String)),
    );
    VersionRegistry::new(ResourceKind::Config, Operation::Create)
        .register(
            VersionedCodec::new(ResourceKind::Config, "v1")
                .with_request(schema.clone())
                .with_response(schema.clone()),
        )
        .register(
            VersionedCodec::new(ResourceKind::Config, "v2")
                .with_request(schema.clone())
                .with_response(schema),
        )
}

fn config_request() -> Value {
    json!({
        "metadata": { "name": "train-config", "annotations": { "team": "ml" } },
        "spec": {
            "selector": { "type": "name", "value": "train" },
            "data": { "epochs": 3 }
        }
    })
}

#[test]
fn test_encode_then_decode_is_stable() {
    let codec = WORKFLOW_CREATE.latest().unwrap();
    let input = json!({
        "metadata": { "name": "wf", "annotations": {} },
        "spec": { "stages": [{ "name": "a", "target": "pkg.a" }] }
    });

    let encoded = codec.encode(&input).unwrap();
    let decoded = codec.decode(&encoded).unwrap();
    assert_eq!(decoded.value(), &encoded);

    let re_encoded = codec.encode(&encoded).unwrap();
    assert_eq!(re_encoded, encoded);
    assert_eq!(encoded["spec"]["stages"][0]["depends_on"], json!([]));
}

#[test]
fn test_resolution_precedence() {
    let registry = two_version_registry();

    let bound = RequestBinder::bind(&registry, Some(json!({ "name": "a" }).into()), None).unwrap();
    assert_eq!(bound.version, "v2");

    let bound =
        RequestBinder::bind(&registry, Some(json!({ "name": "a" }).into()), Some("v1")).unwrap();
    assert_eq!(bound.version, "v1");

    let marked = json!({ "__version": "v1", "name": "a" });
    let bound = RequestBinder::bind(&registry, Some(marked.into()), None).unwrap();
    assert_eq!(bound.version, "v1");

    let err = RequestBinder::bind(&registry, Some(json!({ "name": "a" }).into()), Some("v3"))
        .unwrap_err();
    match err {
        FlowdaptError::UnsupportedVersion {
            version, available, ..
        } => {
            assert_eq!(version, "v3");
            assert_eq!(available, vec!["v1", "v2"]);
        }
        other => panic!("Expected UnsupportedVersion, got {other:?}"),
    }
}

#[test]
fn test_read_only_operation_rejects_body() {
    let err = RequestBinder::bind(&CONFIG_READ, Some(config_request().into()), None).unwrap_err();
    assert!(matches!(err, FlowdaptError::InvalidOperation { .. }));
}

#[test]
fn test_type_mismatch_names_the_path() {
    let schema = Schema::object(
        ObjectSchema::new("Thing").field(Field::required("name", Schema::String)),
    );
    let err = SchemaValidator::validate(&schema, &json!({ "name": 123 })).unwrap_err();
    let violations = err.violations().unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].path, "name");
    assert!(err.to_string().contains("E201"));
}

#[test]
fn test_loose_created_at_is_coerced() {
    let codec = CONFIG_READ.latest().unwrap();
    let mut wire = config_request();
    wire["metadata"]["created_at"] = json!("2024-01-02 10:00:00");

    let envelope = codec.decode(&wire).unwrap();
    assert_eq!(
        envelope.value()["metadata"]["created_at"],
        json!("2024-01-02T10:00:00Z")
    );

    let resource: V1Alpha1ConfigResource = envelope.into_dto().unwrap();
    let created_at = resource.metadata.created_at.unwrap();
    assert_eq!(created_at.naive_utc().to_string(), "2024-01-02 10:00:00");
}

#[test]
fn test_config_negotiation_headers() {
    let codec = CONFIG_CREATE.get("v1alpha1").unwrap();
    assert_eq!(
        codec.content_type(),
        "application/vnd.flowdapt.ai.config.v1alpha1+json"
    );
    assert_eq!(
        build_version_header(ResourceKind::Config.as_str(), "v1alpha1").unwrap(),
        "config.v1alpha1"
    );
    assert_eq!(
        build_accept_header(codec.content_type(), 1.0).unwrap(),
        "application/vnd.flowdapt.ai.config.v1alpha1+json; q=1"
    );
}

#[test]
fn test_create_config_end_to_end() {
    let request = V1Alpha1ConfigResource::new(
        V1Alpha1ResourceMetadata::named("train-config"),
        V1Alpha1ConfigResourceSpec {
            selector: V1Alpha1ConfigSelector::by_name("train"),
            data: Map::new(),
        },
    );

    let body = request.into_request_body().unwrap();
    let bound = RequestBinder::bind(&CONFIG_CREATE, Some(body), None).unwrap();
    let wire = bound.body.clone().unwrap();
    assert_eq!(wire["kind"], "config");

    // The server echoes the resource with server-side fields filled in.
    let mut echoed = wire.clone();
    echoed["metadata"]["uid"] = json!("67e55044-10b1-426f-9247-bb680e5fe0c8");
    echoed["metadata"]["created_at"] = json!("2024-01-02T10:00:00.5");

    let response: ConfigResponse = bound.decoder.decode_as(&echoed).unwrap();
    assert_eq!(response.version(), "v1alpha1");

    let ConfigResponse::V1Alpha1(resource) = response;
    assert_eq!(resource.kind, "config");
    assert_eq!(
        resource.metadata.uid.unwrap().to_string(),
        "67e55044-10b1-426f-9247-bb680e5fe0c8"
    );
    assert!(resource.metadata.created_at.is_some());
}

#[test]
fn test_create_config_without_kind_in_raw_body() {
    let bound = RequestBinder::bind(&CONFIG_CREATE, Some(config_request().into()), None).unwrap();
    assert_eq!(bound.body.unwrap()["kind"], "config");
}

#[test]
fn test_list_decode_preserves_order() {
    let codec = CONFIG_READ.latest().unwrap();
    let items: Vec<Value> = (0..3)
        .map(|i| {
            let mut item = config_request();
            item["metadata"]["name"] = json!(format!("cfg-{i}"));
            item
        })
        .collect();

    let envelopes = codec.decode_list(&Value::Array(items.clone())).unwrap();
    assert_eq!(envelopes.len(), 3);
    for (i, envelope) in envelopes.iter().enumerate() {
        let name = format!("cfg-{i}");
        assert_eq!(envelope.value()["metadata"]["name"], json!(name));
    }

    let mut broken = items;
    broken[1]["metadata"]["name"] = json!(7);
    let err = codec.decode_list(&Value::Array(broken)).unwrap_err();
    assert_eq!(err.violations().unwrap()[0].path, "[1].metadata.name");
}

#[test]
fn test_missing_body_on_create() {
    let err = RequestBinder::bind(&CONFIG_CREATE, None, None).unwrap_err();
    assert!(err.is_invalid_operation());
}
