use std::sync::Arc;

use dashmap::DashMap;

use promsim_core::error::{PromError, Result};
use promsim_core::{Descriptor, Sample};

use super::{Buckets, Counter, Gauge, Histogram, Instrument};
use crate::registry::Collector;

pub type CounterVec = Family<Counter>;
pub type GaugeVec = Family<Gauge>;
pub type HistogramVec = Family<Histogram>;

/// All label combinations of one metric family.
///
/// Children are keyed by label values (in descriptor order) in a sharded map,
/// so writers on different combinations do not contend. Hot paths should keep
/// the `Arc` returned by [`Family::with_label_values`] rather than look it up
/// per call.
pub struct Family<M: Instrument> {
    desc: Descriptor,
    opts: M::Opts,
    children: DashMap<Vec<String>, Arc<M>>,
}

impl<M: Instrument> Family<M> {
    /// Wrap an existing descriptor. Its kind must match the instrument.
    pub fn from_descriptor(desc: Descriptor, opts: M::Opts) -> Result<Self> {
        if desc.kind() != M::KIND {
            return Err(PromError::InvalidDescriptor(format!(
                "{} is declared as {} but backed by a {}",
                desc.name(),
                desc.kind(),
                M::KIND
            )));
        }
        Ok(Self {
            desc,
            opts,
            children: DashMap::new(),
        })
    }

    pub fn with_opts(name: &str, help: &str, label_names: &[&str], opts: M::Opts) -> Result<Self> {
        Self::from_descriptor(Descriptor::new(name, help, M::KIND, label_names)?, opts)
    }

    /// Handle for one label combination, created on first use.
    pub fn with_label_values(&self, values: &[&str]) -> Result<Arc<M>> {
        self.desc.check_label_values(values)?;
        let key: Vec<String> = values.iter().map(|v| v.to_string()).collect();

        if let Some(child) = self.children.get(&key) {
            return Ok(Arc::clone(child.value()));
        }
        let child = self
            .children
            .entry(key)
            .or_insert_with(|| Arc::new(M::build(&self.opts)));
        Ok(Arc::clone(child.value()))
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.desc
    }

    /// Number of label combinations seen so far.
    pub fn cardinality(&self) -> usize {
        self.children.len()
    }
}

impl<M: Instrument> Family<M>
where
    M::Opts: Default,
{
    pub fn new(name: &str, help: &str, label_names: &[&str]) -> Result<Self> {
        Self::with_opts(name, help, label_names, M::Opts::default())
    }
}

impl Family<Histogram> {
    pub fn with_buckets(name: &str, help: &str, label_names: &[&str], buckets: Buckets) -> Result<Self> {
        Self::with_opts(name, help, label_names, buckets)
    }
}

impl<M: Instrument> Collector for Family<M> {
    fn describe(&self) -> Vec<Descriptor> {
        vec![self.desc.clone()]
    }

    fn collect(&self) -> Result<Vec<Sample>> {
        let name = self.desc.name();
        Ok(self
            .children
            .iter()
            .map(|r| Sample {
                name: name.to_string(),
                label_values: r.key().clone(),
                value: r.value().sample_value(),
            })
            .collect())
    }

    fn owner(&self) -> &str {
        self.desc.name()
    }
}
