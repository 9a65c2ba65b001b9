use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use promsim_core::error::{PromError, Result};
use promsim_core::{HistogramSnapshot, MetricKind, SampleValue};

use super::atomic::AtomicF64;
use super::Instrument;

/// Default latency buckets, in seconds.
pub const DEFAULT_BUCKETS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Finite upper bounds, strictly ascending. `+Inf` is implicit.
#[derive(Debug, Clone, PartialEq)]
pub struct Buckets(Arc<[f64]>);

impl Buckets {
    pub fn new(bounds: Vec<f64>) -> Result<Self> {
        if bounds.is_empty() {
            return Err(PromError::InvalidDescriptor("buckets must not be empty".into()));
        }
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(PromError::InvalidDescriptor(
                "bucket bounds must be finite (+Inf is implicit)".into(),
            ));
        }
        if bounds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(PromError::InvalidDescriptor(
                "bucket bounds must be strictly ascending".into(),
            ));
        }
        Ok(Self(bounds.into()))
    }

    /// `count` buckets spaced `width` apart, starting at `start`.
    pub fn linear(start: f64, width: f64, count: usize) -> Result<Self> {
        if count == 0 || width <= 0.0 {
            return Err(PromError::InvalidDescriptor(
                "linear buckets need count > 0 and width > 0".into(),
            ));
        }
        Self::new((0..count).map(|i| start + width * i as f64).collect())
    }

    /// `count` buckets, each `factor` times the previous, starting at `start`.
    pub fn exponential(start: f64, factor: f64, count: usize) -> Result<Self> {
        if count == 0 || start <= 0.0 || factor <= 1.0 {
            return Err(PromError::InvalidDescriptor(
                "exponential buckets need count > 0, start > 0 and factor > 1".into(),
            ));
        }
        let mut bounds = Vec::with_capacity(count);
        let mut b = start;
        for _ in 0..count {
            bounds.push(b);
            b *= factor;
        }
        Self::new(bounds)
    }

    pub fn bounds(&self) -> &[f64] {
        &self.0
    }
}

impl Default for Buckets {
    fn default() -> Self {
        Self(DEFAULT_BUCKETS.as_slice().into())
    }
}

/// Cumulative histogram for one label combination.
///
/// Every field is an independent atomic; a snapshot is not transactional.
/// Writers bump `count` first and then the buckets from the widest bound down,
/// while readers load buckets from the narrowest bound up and `count` last.
/// A snapshot therefore never shows a narrower bucket ahead of a wider one.
/// `sum` may lead or lag the counts.
#[derive(Debug)]
pub struct Histogram {
    buckets: Buckets,
    counts: Box<[AtomicU64]>,
    count: AtomicU64,
    sum: AtomicF64,
}

impl Histogram {
    pub fn new(buckets: Buckets) -> Self {
        let counts = buckets.bounds().iter().map(|_| AtomicU64::new(0)).collect();
        Self {
            buckets,
            counts,
            count: AtomicU64::new(0),
            sum: AtomicF64::default(),
        }
    }

    pub fn observe(&self, v: f64) {
        self.count.fetch_add(1, Ordering::AcqRel);
        self.sum.fetch_add(v);

        // Bounds ascend, so the buckets holding `v` form a suffix.
        for (i, &b) in self.buckets.bounds().iter().enumerate().rev() {
            if v > b || v.is_nan() {
                break;
            }
            self.counts[i].fetch_add(1, Ordering::AcqRel);
        }
    }

    /// Observe a duration in seconds.
    pub fn observe_duration(&self, d: Duration) {
        self.observe(d.as_secs_f64());
    }

    pub fn snapshot(&self) -> HistogramSnapshot {
        let buckets = self
            .buckets
            .bounds()
            .iter()
            .zip(self.counts.iter())
            .map(|(&b, c)| (b, c.load(Ordering::Acquire)))
            .collect();
        let count = self.count.load(Ordering::Acquire);
        HistogramSnapshot {
            buckets,
            sum: self.sum.get(),
            count,
        }
    }

    pub fn buckets(&self) -> &Buckets {
        &self.buckets
    }
}

impl Instrument for Histogram {
    const KIND: MetricKind = MetricKind::Histogram;
    type Opts = Buckets;

    fn build(buckets: &Buckets) -> Self {
        Self::new(buckets.clone())
    }

    fn sample_value(&self) -> SampleValue {
        SampleValue::Histogram(self.snapshot())
    }
}
