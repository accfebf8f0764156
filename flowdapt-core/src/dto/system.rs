//! Server status.

use crate::schema::{Field, ObjectSchema, Schema};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Operating system of the server host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct V1Alpha1SystemStatusOsInfo {
    /// OS name.
    pub name: String,
    /// OS version.
    pub version: String,
    /// Kernel release.
    pub release: String,
    /// Machine architecture.
    pub machine: String,
}

/// Resource usage of the server process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct V1Alpha1SystemStatusSystemInfo {
    /// Sample time.
    pub time: String,
    /// CPU usage, percent.
    pub cpu_pct: f64,
    /// Resident memory.
    pub memory: f64,
    /// Disk usage, percent.
    pub disk_pct: f64,
    /// Bytes sent.
    pub network_io_sent: f64,
    /// Bytes received.
    pub network_io_recv: f64,
    /// Thread count.
    pub threads: u64,
    /// Open file descriptors.
    pub fds: u64,
    /// Process id.
    pub pid: u64,
}

/// Server status snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct V1Alpha1SystemStatus {
    /// Server version.
    pub version: String,
    /// Server name.
    pub name: String,
    /// Process resource usage.
    pub system: V1Alpha1SystemStatusSystemInfo,
    /// Host operating system.
    pub os: V1Alpha1SystemStatusOsInfo,
    /// Python version of the server.
    pub python: String,
    /// Host name.
    pub hostname: String,
    /// Per-service status.
    pub services: Map<String, Value>,
    /// Database driver in use.
    pub database: String,
}

versioned_response! {
    /// Status returned by the status operation.
    SystemStatusResponse {
        V1Alpha1(V1Alpha1SystemStatus) => "v1alpha1",
    }
}

/// Wire schema of [`V1Alpha1SystemStatus`].
pub fn v1alpha1_status_schema() -> Schema {
    let os = Schema::object(
        ObjectSchema::new("V1Alpha1SystemStatusOsInfo")
            .field(Field::required("name", Schema::String))
            .field(Field::required("version", Schema::String))
            .field(Field::required("release", Schema::String))
            .field(Field::required("machine", Schema::String)),
    );

    let system = [
        ("cpu_pct", Schema::Number),
        ("memory", Schema::Number),
        ("disk_pct", Schema::Number),
        ("network_io_sent", Schema::Number),
        ("network_io_recv", Schema::Number),
        ("threads", Schema::Integer),
        ("fds", Schema::Integer),
        ("pid", Schema::Integer),
    ]
    .into_iter()
    .fold(
        ObjectSchema::new("V1Alpha1SystemStatusSystemInfo")
            .field(Field::required("time", Schema::String)),
        |object, (name, schema)| object.field(Field::required(name, schema)),
    );

    Schema::object(
        ObjectSchema::new("V1Alpha1SystemStatus")
            .field(Field::required("version", Schema::String))
            .field(Field::required("name", Schema::String))
            .field(Field::required("system", Schema::object(system)))
            .field(Field::required("os", os))
            .field(Field::required("python", Schema::String))
            .field(Field::required("hostname", Schema::String))
            .field(Field::required("services", Schema::record(Schema::Any)))
            .field(Field::required("database", Schema::String)),
    )
}
