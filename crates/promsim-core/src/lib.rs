//! promsim core: transport-agnostic metric data model, error types, and the
//! text exposition encoder.
//!
//! This crate defines the descriptor/sample contracts shared by the exporter,
//! its collectors, and tests. It carries no runtime or transport dependencies
//! so it can be reused anywhere samples need to be described or rendered.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Every fallible path surfaces as `PromError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod expo;
pub mod model;

/// Shared result type.
pub use error::{Result, PromError};
pub use model::{Descriptor, HistogramSnapshot, MetricFamily, MetricKind, Sample, SampleValue};
