//! Runtime health signals computed lazily on every scrape.
//!
//! Nothing is cached between scrapes; the collector only owns its
//! descriptors. Every read is an atomic load or a clock read, so `collect`
//! stays well under a millisecond and never blocks. A signal the platform
//! cannot provide is reported as `0`.

use std::time::{SystemTime, UNIX_EPOCH};

use promsim_core::error::Result;
use promsim_core::{Descriptor, MetricKind, Sample};

use crate::alloc;
use crate::registry::Collector;

pub const SYSTEM_LOAD_FACTOR: &str = "system_load_factor";
pub const SYSTEM_MEMORY_USAGE_BYTES: &str = "system_memory_usage_bytes";
pub const SYSTEM_TASKS_COUNT: &str = "system_tasks_count";
pub const LAST_PROCESSED_TIMESTAMP: &str = "last_processed_timestamp";

pub struct RuntimeCollector {
    load: Descriptor,
    memory: Descriptor,
    tasks: Descriptor,
    last_processed: Descriptor,
}

impl RuntimeCollector {
    pub fn new() -> Result<Self> {
        Ok(Self {
            load: Descriptor::new(
                SYSTEM_LOAD_FACTOR,
                "Current system load factor",
                MetricKind::Gauge,
                &["component"],
            )?,
            memory: Descriptor::new(
                SYSTEM_MEMORY_USAGE_BYTES,
                "Current memory usage in bytes",
                MetricKind::Gauge,
                &["type"],
            )?,
            tasks: Descriptor::new(
                SYSTEM_TASKS_COUNT,
                "Number of async tasks currently alive",
                MetricKind::Gauge,
                &[],
            )?,
            last_processed: Descriptor::new(
                LAST_PROCESSED_TIMESTAMP,
                "Timestamp of the last processed request",
                MetricKind::Gauge,
                &[],
            )?,
        })
    }
}

/// Alive tasks on the runtime driving the current thread, 0 outside one.
fn alive_tasks() -> usize {
    tokio::runtime::Handle::try_current()
        .map(|h| h.metrics().num_alive_tasks())
        .unwrap_or(0)
}

fn unix_now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as f64)
        .unwrap_or(0.0)
}

impl Collector for RuntimeCollector {
    fn describe(&self) -> Vec<Descriptor> {
        vec![
            self.load.clone(),
            self.memory.clone(),
            self.tasks.clone(),
            self.last_processed.clone(),
        ]
    }

    fn collect(&self) -> Result<Vec<Sample>> {
        let heap = alloc::heap_stats();
        let tasks = alive_tasks();
        let cpus = num_cpus::get().max(1);

        Ok(vec![
            Sample::scalar(self.memory.name(), &["heap_alloc"], heap.alloc as f64),
            Sample::scalar(self.memory.name(), &["heap_sys"], heap.reserved as f64),
            Sample::scalar(self.memory.name(), &["heap_idle"], heap.idle as f64),
            Sample::scalar(self.load.name(), &["cpu_load"], tasks as f64 / cpus as f64),
            Sample::scalar(self.tasks.name(), &[], tasks as f64),
            Sample::scalar(self.last_processed.name(), &[], unix_now_secs()),
        ])
    }

    fn owner(&self) -> &str {
        "runtime"
    }
}
