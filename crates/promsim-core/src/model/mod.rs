//! Metric data model.
//!
//! - `Descriptor`: immutable identity of a metric family (name, help, kind,
//!   ordered label names).
//! - `Sample`: one label-value combination and its value at scrape time.
//! - `MetricFamily`: a descriptor with every sample gathered for it.
//!
//! Descriptors validate their names on construction (including when
//! deserialized) so an invalid family can never reach the encoder.

pub mod descriptor;
pub mod sample;

pub use descriptor::{Descriptor, MetricKind};
pub use sample::{HistogramSnapshot, MetricFamily, Sample, SampleValue};
