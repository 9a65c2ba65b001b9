use std::collections::HashSet;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use promsim_core::error::{PromError, Result};
use promsim_core::{Descriptor, MetricFamily, MetricKind, Sample, SampleValue};

/// Anything that can describe its metric families and produce samples on
/// demand. Instrument families and on-demand collectors both implement this.
pub trait Collector: Send + Sync {
    /// Fixed set of descriptors. Must return the same list on every call.
    fn describe(&self) -> Vec<Descriptor>;

    /// Fresh samples for the described families.
    fn collect(&self) -> Result<Vec<Sample>>;

    /// Name used in logs when collection fails.
    fn owner(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

struct Entry {
    collector: Arc<dyn Collector>,
    descriptors: Vec<Descriptor>,
}

#[derive(Default)]
struct Inner {
    entries: Vec<Arc<Entry>>,
    names: HashSet<String>,
}

/// Append-only set of collectors keyed by descriptor name.
///
/// The write lock is taken only during registration; a scrape holds the read
/// lock just long enough to clone the entry list, so collection itself runs
/// unlocked.
#[derive(Default)]
pub struct Registry {
    inner: RwLock<Inner>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collector. Fails without side effects if any of its
    /// descriptor names is already taken (or repeated within the collector).
    pub fn register(&self, collector: Arc<dyn Collector>) -> Result<()> {
        let descriptors = collector.describe();

        let mut inner = self.write();
        let mut seen = HashSet::new();
        for d in &descriptors {
            if inner.names.contains(d.name()) || !seen.insert(d.name()) {
                return Err(PromError::DuplicateName(d.name().to_string()));
            }
        }
        for d in &descriptors {
            inner.names.insert(d.name().to_string());
        }

        tracing::debug!(
            owner = collector.owner(),
            families = descriptors.len(),
            "collector registered"
        );
        inner.entries.push(Arc::new(Entry {
            collector,
            descriptors,
        }));
        Ok(())
    }

    /// Registered descriptor names, in registration order.
    pub fn descriptor_names(&self) -> Vec<String> {
        self.read()
            .entries
            .iter()
            .flat_map(|e| e.descriptors.iter().map(|d| d.name().to_string()))
            .collect()
    }

    /// Collect every registered owner into families, in registration order.
    ///
    /// A failing owner is logged and skipped; its families are absent from
    /// this scrape while everything else is still returned.
    pub fn gather(&self) -> Vec<MetricFamily> {
        let entries: Vec<Arc<Entry>> = self.read().entries.clone();

        let mut out = Vec::new();
        for e in entries {
            match e.collector.collect() {
                Ok(samples) => out.extend(group(e.collector.owner(), &e.descriptors, samples)),
                Err(err) => {
                    tracing::warn!(
                        owner = e.collector.owner(),
                        code = err.code().as_str(),
                        error = %err,
                        "collector failed, skipping for this scrape"
                    );
                }
            }
        }
        out
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|poisoned| {
            tracing::warn!("registry lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|poisoned| {
            tracing::warn!("registry lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

/// Group samples under their descriptors, dropping anything that does not fit
/// the declared schema.
fn group(owner: &str, descriptors: &[Descriptor], samples: Vec<Sample>) -> Vec<MetricFamily> {
    let mut families: Vec<MetricFamily> =
        descriptors.iter().cloned().map(MetricFamily::new).collect();

    for s in samples {
        let Some(family) = families.iter_mut().find(|f| f.name() == s.name) else {
            tracing::warn!(owner, metric = %s.name, "sample for undeclared metric dropped");
            continue;
        };
        if let Err(err) = family.descriptor.check_label_values(&s.label_values) {
            tracing::warn!(owner, error = %err, "sample dropped");
            continue;
        }
        let kind_ok = matches!(
            (&s.value, family.descriptor.kind()),
            (SampleValue::Histogram(_), MetricKind::Histogram)
                | (SampleValue::Scalar(_), MetricKind::Counter | MetricKind::Gauge)
        );
        if !kind_ok {
            tracing::warn!(owner, metric = %s.name, "sample value does not match metric kind, dropped");
            continue;
        }
        family.samples.push(s);
    }

    for f in &mut families {
        f.samples.sort_by(|a, b| a.label_values.cmp(&b.label_values));
    }
    families
}
