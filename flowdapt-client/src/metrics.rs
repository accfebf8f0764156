//! Server metrics.

use crate::client::{ApiRequest, Client};
use crate::error::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use flowdapt_core::descriptors::METRICS_READ;
use flowdapt_core::dto::metrics::MetricsResponse;
use flowdapt_core::RequestBinder;
use reqwest::Method;

/// Filters for [`MetricsApi::get_metrics`].
///
/// Unset filters are left out of the query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsQuery {
    /// Only this metric.
    pub name: Option<String>,
    /// Only data points observed at or after this time.
    pub start_time: Option<DateTime<Utc>>,
    /// Only data points observed at or before this time.
    pub end_time: Option<DateTime<Utc>>,
    /// At most this many data points per metric.
    pub max_length: Option<u32>,
    /// Schema version of the returned metrics.
    pub version: Option<String>,
}

impl MetricsQuery {
    /// Query every metric.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one metric.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Restrict to a time window.
    #[must_use]
    pub fn between(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start_time = Some(start);
        self.end_time = Some(end);
        self
    }

    /// Limit the number of data points per metric.
    #[must_use]
    pub fn max_length(mut self, max_length: u32) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Decode with a specific schema version.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(ref name) = self.name {
            pairs.push(("name", name.clone()));
        }
        if let Some(ref start) = self.start_time {
            pairs.push(("start_time", format_query_time(start)));
        }
        if let Some(ref end) = self.end_time {
            pairs.push(("end_time", format_query_time(end)));
        }
        if let Some(max_length) = self.max_length {
            pairs.push(("max_length", max_length.to_string()));
        }
        pairs
    }
}

/// RFC 3339 with millisecond precision and a `Z` suffix.
fn format_query_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// API for server metrics.
#[derive(Debug, Clone)]
pub struct MetricsApi {
    client: Client,
}

impl MetricsApi {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Get metrics matching `query`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use flowdapt_client::{FlowdaptSdk, MetricsQuery};
    /// use flowdapt_core::dto::metrics::MetricsResponse;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let sdk = FlowdaptSdk::new("http://localhost:8080")?;
    /// let query = MetricsQuery::new().name("workflow_runs").max_length(50);
    /// let MetricsResponse::V1Alpha1(metrics) = sdk.metrics.get_metrics(query).await?;
    /// for name in metrics.names() {
    ///     println!("{}", name);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_metrics(&self, query: MetricsQuery) -> Result<MetricsResponse> {
        let bound = RequestBinder::bind(&METRICS_READ, None, query.version.as_deref())?;
        let mut request = ApiRequest::new(Method::GET, &["metrics"]);
        for (key, value) in query.pairs() {
            request = request.query(key, value);
        }
        self.client.call(request, &bound).await
    }
}
