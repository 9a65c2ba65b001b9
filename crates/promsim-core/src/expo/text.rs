//! Prometheus text exposition format (version 0.0.4).

use std::fmt::Write;

use crate::model::{Descriptor, HistogramSnapshot, MetricFamily, MetricKind, SampleValue};

/// Content type advertised by the scrape endpoint.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Escape a label value.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// Escape help text (quotes are left alone).
fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

/// Render a sample value. Non-finite values use the Prometheus spellings.
pub fn format_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v == f64::INFINITY {
        "+Inf".to_string()
    } else if v == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        format!("{v}")
    }
}

/// `k1="v1",k2="v2"` for the descriptor's labels, plus an optional extra pair.
fn label_pairs(desc: &Descriptor, values: &[String], extra: Option<(&str, &str)>) -> String {
    let mut parts: Vec<String> = desc
        .label_names()
        .iter()
        .zip(values)
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect();
    if let Some((k, v)) = extra {
        parts.push(format!("{}=\"{}\"", k, escape_label(v)));
    }
    parts.join(",")
}

fn write_line(out: &mut String, name: &str, labels: &str, value: &str) {
    if labels.is_empty() {
        let _ = writeln!(out, "{} {}", name, value);
    } else {
        let _ = writeln!(out, "{}{{{}}} {}", name, labels, value);
    }
}

fn write_histogram(out: &mut String, desc: &Descriptor, values: &[String], h: &HistogramSnapshot) {
    let name = desc.name();
    let bucket = format!("{name}_bucket");
    for &(le, count) in &h.buckets {
        let labels = label_pairs(desc, values, Some(("le", &format_value(le))));
        write_line(out, &bucket, &labels, &count.to_string());
    }
    let labels = label_pairs(desc, values, Some(("le", "+Inf")));
    write_line(out, &bucket, &labels, &h.count.to_string());

    let labels = label_pairs(desc, values, None);
    write_line(out, &format!("{name}_sum"), &labels, &format_value(h.sum));
    write_line(out, &format!("{name}_count"), &labels, &h.count.to_string());
}

/// Render one family: HELP and TYPE lines, then its samples.
pub fn encode_family(out: &mut String, family: &MetricFamily) {
    let desc = &family.descriptor;
    let name = desc.name();
    let _ = writeln!(out, "# HELP {} {}", name, escape_help(desc.help()));
    let _ = writeln!(out, "# TYPE {} {}", name, desc.kind());

    for s in &family.samples {
        match (&s.value, desc.kind()) {
            (SampleValue::Histogram(h), MetricKind::Histogram) => {
                write_histogram(out, desc, &s.label_values, h);
            }
            (SampleValue::Scalar(v), MetricKind::Counter | MetricKind::Gauge) => {
                let labels = label_pairs(desc, &s.label_values, None);
                write_line(out, name, &labels, &format_value(*v));
            }
            // Kind mismatch: the registry filters these, skip silently here.
            _ => {}
        }
    }
}

/// Render every family in order.
pub fn encode(families: &[MetricFamily]) -> String {
    let mut out = String::new();
    for f in families {
        encode_family(&mut out, f);
    }
    out
}
