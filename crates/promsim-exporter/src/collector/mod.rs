//! On-demand collectors: values computed at scrape time, never stored.

pub mod runtime;

pub use runtime::RuntimeCollector;
