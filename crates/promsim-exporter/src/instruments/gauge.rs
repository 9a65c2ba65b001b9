use promsim_core::{MetricKind, SampleValue};

use super::atomic::AtomicF64;
use super::Instrument;

/// Unconstrained scalar for one label combination.
#[derive(Debug, Default)]
pub struct Gauge {
    value: AtomicF64,
}

impl Gauge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, v: f64) {
        self.value.set(v);
    }

    pub fn inc(&self) {
        self.add(1.0);
    }

    pub fn dec(&self) {
        self.add(-1.0);
    }

    pub fn add(&self, delta: f64) {
        self.value.fetch_add(delta);
    }

    pub fn sub(&self, delta: f64) {
        self.value.fetch_add(-delta);
    }

    pub fn get(&self) -> f64 {
        self.value.get()
    }
}

impl Instrument for Gauge {
    const KIND: MetricKind = MetricKind::Gauge;
    type Opts = ();

    fn build(_: &()) -> Self {
        Self::new()
    }

    fn sample_value(&self) -> SampleValue {
        SampleValue::Scalar(self.get())
    }
}
