use promsim_core::error::{PromError, Result};
use promsim_core::{MetricKind, SampleValue};

use super::atomic::AtomicF64;
use super::Instrument;

/// Monotonic counter for one label combination.
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicF64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment by 1.
    pub fn inc(&self) {
        self.value.fetch_add(1.0);
    }

    /// Increment by `delta`. Negative or non-finite deltas are rejected and
    /// leave the value untouched.
    pub fn add(&self, delta: f64) -> Result<()> {
        if !delta.is_finite() || delta < 0.0 {
            return Err(PromError::InvalidDelta(delta));
        }
        self.value.fetch_add(delta);
        Ok(())
    }

    pub fn get(&self) -> f64 {
        self.value.get()
    }
}

impl Instrument for Counter {
    const KIND: MetricKind = MetricKind::Counter;
    type Opts = ();

    fn build(_: &()) -> Self {
        Self::new()
    }

    fn sample_value(&self) -> SampleValue {
        SampleValue::Scalar(self.get())
    }
}
