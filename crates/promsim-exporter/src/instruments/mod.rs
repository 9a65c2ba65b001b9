//! Pre-aggregated instruments (counter / gauge / histogram).
//!
//! Each instrument backs one label combination and is mutated lock-free:
//! scalar values are `f64` bit-cast into `AtomicU64` and updated by CAS.
//! Label combinations are owned by a [`Family`], which hands out `Arc`
//! handles created on first use and cached for the process lifetime.

pub mod atomic;
pub mod counter;
pub mod family;
pub mod gauge;
pub mod histogram;

use promsim_core::{MetricKind, SampleValue};

pub use counter::Counter;
pub use family::{CounterVec, Family, GaugeVec, HistogramVec};
pub use gauge::Gauge;
pub use histogram::{Buckets, Histogram, DEFAULT_BUCKETS};

/// A concurrently mutated accumulator that can be read at scrape time.
pub trait Instrument: Send + Sync + 'static {
    const KIND: MetricKind;
    /// Construction options shared by every child of a family.
    type Opts: Clone + Send + Sync + 'static;

    fn build(opts: &Self::Opts) -> Self;
    fn sample_value(&self) -> SampleValue;
}
