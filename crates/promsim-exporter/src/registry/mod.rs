//! Metric registry module exports.
//!
//! Re-exports the registry and the collector trait so downstream consumers can
//! depend on this module directly.

pub mod registry;

pub use registry::{Collector, Registry};
