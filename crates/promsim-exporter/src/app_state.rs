//! Shared application state for the exporter.
//!
//! Built once in `main` and cloned into every handler. The registry is
//! constructed here and handed to both the workload (through `AppMetrics`)
//! and the scrape handler; nothing is reachable through globals.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use promsim_core::error::Result;

use crate::collector::RuntimeCollector;
use crate::config::ExporterConfig;
use crate::obs::AppMetrics;
use crate::registry::Registry;
use crate::workload::WorkloadSimulator;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    registry: Arc<Registry>,
    metrics: Arc<AppMetrics>,
}

struct AppStateInner {
    cfg: ExporterConfig,
    draining: AtomicBool,
}

impl AppState {
    /// Build the registry and register every metric owner.
    /// A name collision here is fatal to startup.
    pub fn new(cfg: ExporterConfig) -> Result<Self> {
        let registry = Arc::new(Registry::new());

        // 1) on-demand runtime signals
        registry.register(Arc::new(RuntimeCollector::new()?))?;

        // 2) pre-aggregated request instruments
        let buckets = cfg.workload.histogram_buckets()?;
        let metrics = Arc::new(AppMetrics::register(&registry, buckets)?);

        tracing::debug!(families = ?registry.descriptor_names(), "metric families registered");

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                draining: AtomicBool::new(false),
            }),
            registry,
            metrics,
        })
    }

    pub fn cfg(&self) -> &ExporterConfig {
        &self.inner.cfg
    }

    pub fn registry(&self) -> Arc<Registry> {
        Arc::clone(&self.registry)
    }

    pub fn metrics(&self) -> Arc<AppMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Simulator wired to this state's instruments.
    pub fn simulator(&self) -> WorkloadSimulator {
        WorkloadSimulator::new(&self.inner.cfg.workload, self.metrics())
    }

    /// Mark draining state.
    pub fn set_draining(&self) {
        self.inner.draining.store(true, Ordering::Relaxed);
    }

    /// Return whether draining is active.
    pub fn is_draining(&self) -> bool {
        self.inner.draining.load(Ordering::Relaxed)
    }
}
