use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use promsim_core::error::{PromError, Result};

use crate::instruments::{Buckets, DEFAULT_BUCKETS};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    pub version: u32,

    #[serde(default)]
    pub exporter: ExporterSection,

    #[serde(default)]
    pub workload: WorkloadSection,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            version: 1,
            exporter: ExporterSection::default(),
            workload: WorkloadSection::default(),
        }
    }
}

impl ExporterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(PromError::BadConfig(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        self.exporter.validate()?;
        self.workload.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_metrics_path")]
    pub metrics_path: String,
}

impl Default for ExporterSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            metrics_path: default_metrics_path(),
        }
    }
}

impl ExporterSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !self.metrics_path.starts_with('/') {
            return Err(PromError::BadConfig(
                "exporter.metrics_path must start with '/'".into(),
            ));
        }
        if ["/healthz", "/readyz"].contains(&self.metrics_path.as_str()) {
            return Err(PromError::BadConfig(
                "exporter.metrics_path collides with an ops endpoint".into(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            PromError::BadConfig(format!("exporter.listen must be a valid SocketAddr: {e}"))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:2115".into()
}
fn default_metrics_path() -> String {
    "/metrics".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkloadSection {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    #[serde(default = "default_latency_min_ms")]
    pub latency_min_ms: u64,

    #[serde(default = "default_latency_max_ms")]
    pub latency_max_ms: u64,

    #[serde(default = "default_buckets")]
    pub buckets: Vec<f64>,

    #[serde(default = "default_endpoints")]
    pub endpoints: Vec<EndpointSpec>,
}

impl Default for WorkloadSection {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            latency_min_ms: default_latency_min_ms(),
            latency_max_ms: default_latency_max_ms(),
            buckets: default_buckets(),
            endpoints: default_endpoints(),
        }
    }
}

impl WorkloadSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=60_000).contains(&self.interval_ms) {
            return Err(PromError::BadConfig(
                "workload.interval_ms must be between 1 and 60000".into(),
            ));
        }
        if self.latency_min_ms > self.latency_max_ms {
            return Err(PromError::BadConfig(
                "workload.latency_min_ms must not exceed latency_max_ms".into(),
            ));
        }
        if self.latency_max_ms > 60_000 {
            return Err(PromError::BadConfig(
                "workload.latency_max_ms must be at most 60000".into(),
            ));
        }
        if self.endpoints.is_empty() {
            return Err(PromError::BadConfig("workload.endpoints must not be empty".into()));
        }
        for ep in &self.endpoints {
            ep.validate()?;
        }
        self.histogram_buckets()
            .map_err(|e| PromError::BadConfig(format!("workload.buckets: {e}")))?;
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn histogram_buckets(&self) -> Result<Buckets> {
        Buckets::new(self.buckets.clone())
    }
}

fn default_interval_ms() -> u64 {
    1000
}
fn default_latency_min_ms() -> u64 {
    100
}
fn default_latency_max_ms() -> u64 {
    999
}
fn default_buckets() -> Vec<f64> {
    DEFAULT_BUCKETS.to_vec()
}
fn default_endpoints() -> Vec<EndpointSpec> {
    vec![
        EndpointSpec::new("GET", "/users"),
        EndpointSpec::new("POST", "/login"),
        EndpointSpec::new("GET", "/metrics"),
    ]
}

/// One simulated (method, endpoint) pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointSpec {
    pub method: String,
    pub path: String,
}

impl EndpointSpec {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.method.trim().is_empty() {
            return Err(PromError::BadConfig("workload endpoint method must not be empty".into()));
        }
        if !self.path.starts_with('/') {
            return Err(PromError::BadConfig(format!(
                "workload endpoint path must start with '/': {}",
                self.path
            )));
        }
        Ok(())
    }
}
