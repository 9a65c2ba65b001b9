use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::error::{PromError, Result};

/// Label reserved for histogram bucket bounds.
pub const BUCKET_LABEL: &str = "le";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Counter,
    Gauge,
    Histogram,
}

impl MetricKind {
    /// Name used on `# TYPE` lines.
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Histogram => "histogram",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a metric family. The label-name list is fixed at creation.
///
/// Cloning is cheap: the label names are shared.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawDescriptor")]
pub struct Descriptor {
    name: String,
    help: String,
    kind: MetricKind,
    label_names: Arc<[String]>,
}

impl Descriptor {
    /// Build a validated descriptor.
    pub fn new(
        name: impl Into<String>,
        help: impl Into<String>,
        kind: MetricKind,
        label_names: &[&str],
    ) -> Result<Self> {
        let name = name.into();
        validate_metric_name(&name)?;

        let mut labels: Vec<String> = Vec::with_capacity(label_names.len());
        for l in label_names {
            validate_label_name(&name, l)?;
            if kind == MetricKind::Histogram && *l == BUCKET_LABEL {
                return Err(PromError::InvalidDescriptor(format!(
                    "{name}: histogram cannot use reserved label '{BUCKET_LABEL}'"
                )));
            }
            if labels.iter().any(|x| x == l) {
                return Err(PromError::InvalidDescriptor(format!(
                    "{name}: duplicate label name '{l}'"
                )));
            }
            labels.push((*l).to_string());
        }

        Ok(Self {
            name,
            help: help.into(),
            kind,
            label_names: labels.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    pub fn label_names(&self) -> &[String] {
        &self.label_names
    }

    /// Check a label-value tuple against this descriptor's dimensionality.
    pub fn check_label_values<S: AsRef<str>>(&self, values: &[S]) -> Result<()> {
        if values.len() != self.label_names.len() {
            return Err(PromError::InvalidLabels {
                metric: self.name.clone(),
                expected: self.label_names.len(),
                got: values.len(),
            });
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDescriptor {
    name: String,
    #[serde(default)]
    help: String,
    kind: MetricKind,
    #[serde(default)]
    label_names: Vec<String>,
}

impl TryFrom<RawDescriptor> for Descriptor {
    type Error = PromError;

    fn try_from(raw: RawDescriptor) -> Result<Self> {
        let labels: Vec<&str> = raw.label_names.iter().map(String::as_str).collect();
        Descriptor::new(raw.name, raw.help, raw.kind, &labels)
    }
}

// [a-zA-Z_:][a-zA-Z0-9_:]*
fn validate_metric_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let ok = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
        }
        _ => false,
    };
    if !ok {
        return Err(PromError::InvalidDescriptor(format!(
            "invalid metric name '{name}'"
        )));
    }
    Ok(())
}

// [a-zA-Z_][a-zA-Z0-9_]*, and "__" prefix is reserved.
fn validate_label_name(metric: &str, label: &str) -> Result<()> {
    let mut chars = label.chars();
    let ok = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if !ok || label.starts_with("__") {
        return Err(PromError::InvalidDescriptor(format!(
            "{metric}: invalid label name '{label}'"
        )));
    }
    Ok(())
}
