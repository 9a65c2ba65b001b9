//! Application instruments mutated by the workload and read by scrapes.

pub mod metrics;

pub use metrics::{AppMetrics, InFlightGuard};
