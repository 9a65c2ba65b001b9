//! Request-level instruments for the simulated service.
//!
//! Families are created once at startup and registered with the shared
//! registry; the workload only ever touches them through `Arc` handles.

use std::sync::Arc;
use std::time::Duration;

use promsim_core::error::Result;

use crate::instruments::{Buckets, CounterVec, Gauge, GaugeVec, HistogramVec};
use crate::registry::Registry;

pub const APP_REQUESTS_TOTAL: &str = "app_requests_total";
pub const APP_CONCURRENT_REQUESTS: &str = "app_concurrent_requests";
pub const APP_REQUEST_DURATION_SECONDS: &str = "app_request_duration_seconds";

pub struct AppMetrics {
    pub requests_total: Arc<CounterVec>,
    pub concurrent_requests: Arc<GaugeVec>,
    pub request_duration: Arc<HistogramVec>,
    in_flight: Arc<Gauge>,
}

impl AppMetrics {
    /// Create the families and register them. Fails on name collisions.
    pub fn register(registry: &Registry, buckets: Buckets) -> Result<Self> {
        let requests_total = Arc::new(CounterVec::new(
            APP_REQUESTS_TOTAL,
            "Total number of requests processed",
            &["method", "endpoint", "status"],
        )?);
        let concurrent_requests = Arc::new(GaugeVec::new(
            APP_CONCURRENT_REQUESTS,
            "Number of concurrent requests being processed",
            &[],
        )?);
        let request_duration = Arc::new(HistogramVec::with_buckets(
            APP_REQUEST_DURATION_SECONDS,
            "Request latency in seconds",
            &["method", "endpoint"],
            buckets,
        )?);

        registry.register(requests_total.clone())?;
        registry.register(concurrent_requests.clone())?;
        registry.register(request_duration.clone())?;

        let in_flight = concurrent_requests.with_label_values(&[])?;

        Ok(Self {
            requests_total,
            concurrent_requests,
            request_duration,
            in_flight,
        })
    }

    /// Count one request as in flight until the guard drops.
    pub fn track_in_flight(&self) -> InFlightGuard {
        InFlightGuard::new(Arc::clone(&self.in_flight))
    }

    pub fn in_flight(&self) -> f64 {
        self.in_flight.get()
    }

    /// Record a finished request.
    pub fn record_request(&self, method: &str, endpoint: &str, status: &str, elapsed: Duration) -> Result<()> {
        self.requests_total
            .with_label_values(&[method, endpoint, status])?
            .inc();
        self.request_duration
            .with_label_values(&[method, endpoint])?
            .observe_duration(elapsed);
        Ok(())
    }
}

/// Increments a gauge on creation and decrements it on drop, so the gauge is
/// restored even when the owning task is aborted mid-flight.
pub struct InFlightGuard {
    gauge: Arc<Gauge>,
}

impl InFlightGuard {
    pub fn new(gauge: Arc<Gauge>) -> Self {
        gauge.inc();
        Self { gauge }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.gauge.dec();
    }
}
