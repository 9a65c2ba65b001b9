#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use promsim_core::{Descriptor, HistogramSnapshot, MetricKind};

#[test]
fn accepts_valid_names() {
    let d = Descriptor::new(
        "app_requests_total",
        "Total number of requests processed",
        MetricKind::Counter,
        &["method", "endpoint", "status"],
    )
    .expect("valid descriptor");
    assert_eq!(d.name(), "app_requests_total");
    assert_eq!(d.label_names(), ["method", "endpoint", "status"]);
    assert_eq!(d.kind().as_str(), "counter");

    Descriptor::new("ns:sub_metric", "", MetricKind::Gauge, &[]).expect("colons allowed");
}

#[test]
fn rejects_bad_metric_and_label_names() {
    let cases: [(&str, &[&str]); 5] = [
        ("", &[]),
        ("1metric", &[]),
        ("bad-name", &[]),
        ("ok_name", &["__reserved"]),
        ("ok_name", &["dup", "dup"]),
    ];
    for (name, labels) in cases {
        let err = Descriptor::new(name, "", MetricKind::Gauge, labels).expect_err(name);
        assert_eq!(err.code().as_str(), "INVALID_DESCRIPTOR", "name={name}");
    }
}

#[test]
fn label_value_count_is_enforced() {
    let d = Descriptor::new("m", "", MetricKind::Counter, &["a", "b"]).unwrap();
    assert!(d.check_label_values(&["x", "y"]).is_ok());
    let err = d.check_label_values(&["x"]).expect_err("one value short");
    assert_eq!(err.code().as_str(), "INVALID_LABELS");
}

#[test]
fn cumulative_check() {
    let ok = HistogramSnapshot { buckets: vec![(0.1, 1), (1.0, 3)], sum: 2.0, count: 3 };
    assert!(ok.is_cumulative());
    let bad = HistogramSnapshot { buckets: vec![(0.1, 2), (1.0, 1)], sum: 2.0, count: 3 };
    assert!(!bad.is_cumulative());
    let bad_inf = HistogramSnapshot { buckets: vec![(0.1, 2)], sum: 2.0, count: 1 };
    assert!(!bad_inf.is_cumulative());
}
