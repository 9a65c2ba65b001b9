use serde::Deserialize;

use super::descriptor::Descriptor;

/// Point-in-time histogram state.
///
/// `buckets` holds `(upper_bound, cumulative_count)` for every finite bound in
/// ascending order; the implicit `+Inf` bucket equals `count`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistogramSnapshot {
    pub buckets: Vec<(f64, u64)>,
    pub sum: f64,
    pub count: u64,
}

impl HistogramSnapshot {
    /// True when counts never decrease as the bound grows, `+Inf` included.
    pub fn is_cumulative(&self) -> bool {
        let mut prev = 0u64;
        for &(_, c) in &self.buckets {
            if c < prev {
                return false;
            }
            prev = c;
        }
        self.count >= prev
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SampleValue {
    Scalar(f64),
    Histogram(HistogramSnapshot),
}

impl SampleValue {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            SampleValue::Scalar(v) => Some(*v),
            SampleValue::Histogram(_) => None,
        }
    }

    pub fn as_histogram(&self) -> Option<&HistogramSnapshot> {
        match self {
            SampleValue::Histogram(h) => Some(h),
            SampleValue::Scalar(_) => None,
        }
    }
}

/// One label-value combination of a family.
///
/// `label_values` is ordered like the descriptor's label names.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Sample {
    pub name: String,
    #[serde(default)]
    pub label_values: Vec<String>,
    pub value: SampleValue,
}

impl Sample {
    pub fn scalar(name: impl Into<String>, label_values: &[&str], value: f64) -> Self {
        Self {
            name: name.into(),
            label_values: label_values.iter().map(|v| v.to_string()).collect(),
            value: SampleValue::Scalar(value),
        }
    }

    pub fn histogram(name: impl Into<String>, label_values: &[&str], h: HistogramSnapshot) -> Self {
        Self {
            name: name.into(),
            label_values: label_values.iter().map(|v| v.to_string()).collect(),
            value: SampleValue::Histogram(h),
        }
    }
}

/// A descriptor and everything gathered for it in one scrape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricFamily {
    pub descriptor: Descriptor,
    #[serde(default)]
    pub samples: Vec<Sample>,
}

impl MetricFamily {
    pub fn new(descriptor: Descriptor) -> Self {
        Self {
            descriptor,
            samples: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    /// Find the sample whose label values match exactly.
    pub fn sample(&self, label_values: &[&str]) -> Option<&Sample> {
        self.samples.iter().find(|s| {
            s.label_values.len() == label_values.len()
                && s.label_values.iter().zip(label_values).all(|(a, b)| a == b)
        })
    }
}
