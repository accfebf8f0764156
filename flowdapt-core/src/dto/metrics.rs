//! Server metrics.
//!
//! Metrics come back as a map from metric name to its data points. A data
//! point is either a histogram bucket or a plain count.

use crate::schema::{Field, ObjectSchema, Schema};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// A histogram data point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct V1Alpha1MetricsBucketValue {
    /// Point attributes.
    pub attributes: Map<String, Value>,
    /// Start of the aggregation window.
    pub start_time_unix_nano: Option<u64>,
    /// Time of the observation.
    pub time_unix_nano: u64,
    /// Number of observations.
    pub count: u64,
    /// Observations per bucket.
    pub bucket_counts: Vec<u64>,
    /// Bucket upper bounds.
    pub explicit_bounds: Vec<f64>,
    /// Sum of observations.
    pub sum: f64,
    /// Smallest observation.
    pub min: f64,
    /// Largest observation.
    pub max: f64,
}

/// A counter or gauge data point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct V1Alpha1MetricsCountValue {
    /// Point attributes.
    pub attributes: Map<String, Value>,
    /// Start of the aggregation window.
    pub start_time_unix_nano: Option<u64>,
    /// Time of the observation.
    pub time_unix_nano: u64,
    /// Observed value.
    pub value: f64,
}

/// One metric data point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum V1Alpha1MetricsValue {
    /// Histogram point.
    Bucket(V1Alpha1MetricsBucketValue),
    /// Counter or gauge point.
    Count(V1Alpha1MetricsCountValue),
}

/// Data points keyed by metric name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct V1Alpha1Metrics(pub HashMap<String, Vec<V1Alpha1MetricsValue>>);

impl V1Alpha1Metrics {
    /// Data points of one metric.
    pub fn get(&self, name: &str) -> Option<&[V1Alpha1MetricsValue]> {
        self.0.get(name).map(Vec::as_slice)
    }

    /// Metric names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

versioned_response! {
    /// Metrics returned by the metrics read operation.
    MetricsResponse {
        V1Alpha1(V1Alpha1Metrics) => "v1alpha1",
    }
}

fn point_fields(object: ObjectSchema) -> ObjectSchema {
    object
        .field(Field::required("attributes", Schema::record(Schema::Any)))
        .field(Field::required("start_time_unix_nano", Schema::Integer).nullable())
        .field(Field::required("time_unix_nano", Schema::Integer))
}

/// Wire schema of [`V1Alpha1MetricsBucketValue`].
pub fn v1alpha1_bucket_schema() -> Schema {
    Schema::object(
        point_fields(ObjectSchema::new("V1Alpha1MetricsBucketValue"))
            .field(Field::required("count", Schema::Integer))
            .field(Field::required(
                "bucket_counts",
                Schema::array(Schema::Integer),
            ))
            .field(Field::required(
                "explicit_bounds",
                Schema::array(Schema::Number),
            ))
            .field(Field::required("sum", Schema::Number))
            .field(Field::required("min", Schema::Number))
            .field(Field::required("max", Schema::Number)),
    )
}

/// Wire schema of [`V1Alpha1MetricsCountValue`].
pub fn v1alpha1_count_schema() -> Schema {
    Schema::object(
        point_fields(ObjectSchema::new("V1Alpha1MetricsCountValue"))
            .field(Field::required("value", Schema::Number)),
    )
}

/// Wire schema of [`V1Alpha1Metrics`].
pub fn v1alpha1_metrics_schema() -> Schema {
    Schema::record(Schema::array(Schema::union(vec![
        v1alpha1_bucket_schema(),
        v1alpha1_count_schema(),
    ])))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FlowdaptError;
    use crate::schema::SchemaValidator;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "flowdapt.requests": [
                {
                    "attributes": { "route": "/status" },
                    "start_time_unix_nano": null,
                    "time_unix_nano": 1700000000000000000u64,
                    "value": 4
                }
            ],
            "flowdapt.latency": [
                {
                    "attributes": {},
                    "start_time_unix_nano": 1690000000000000000u64,
                    "time_unix_nano": 1700000000000000000u64,
                    "count": 3,
                    "bucket_counts": [1, 2],
                    "explicit_bounds": [0.5],
                    "sum": 1.5,
                    "min": 0.1,
                    "max": 0.9
                }
            ]
        })
    }

    #[test]
    fn metrics_union_picks_matching_shape() {
        let value = SchemaValidator::validate(&v1alpha1_metrics_schema(), &sample()).unwrap();
        let metrics: V1Alpha1Metrics = serde_json::from_value(value).unwrap();

        assert!(matches!(
            metrics.get("flowdapt.requests").unwrap()[0],
            V1Alpha1MetricsValue::Count(_)
        ));
        assert!(matches!(
            metrics.get("flowdapt.latency").unwrap()[0],
            V1Alpha1MetricsValue::Bucket(_)
        ));
        assert_eq!(metrics.names().count(), 2);
    }

    #[test]
    fn fractional_timestamps_fail_validation() {
        let wire = json!({
            "m": [{
                "attributes": {},
                "start_time_unix_nano": null,
                "time_unix_nano": 1.5e18,
                "value": 1
            }]
        });
        let err = SchemaValidator::validate(&v1alpha1_metrics_schema(), &wire).unwrap_err();

        assert!(matches!(err, FlowdaptError::SchemaValidation { .. }));
        assert_eq!(err.violations().unwrap()[0].path, "m[0]");
    }

    #[test]
    fn point_matching_neither_shape_fails() {
        let err = SchemaValidator::validate(
            &v1alpha1_metrics_schema(),
            &json!({ "m": [{ "attributes": {}, "time_unix_nano": 1 }] }),
        )
        .unwrap_err();
        assert_eq!(err.violations().unwrap()[0].path, "m[0]");
    }
}
