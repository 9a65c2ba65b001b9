//! promsim exporter library entry.
//!
//! This crate wires the metric registry, the instrument families, the
//! on-demand runtime collector, and the workload simulator behind a small
//! axum scrape endpoint. It is consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod alloc;
pub mod app_state;
pub mod collector;
pub mod config;
pub mod instruments;
pub mod obs;
pub mod ops;
pub mod registry;
pub mod router;
pub mod workload;
