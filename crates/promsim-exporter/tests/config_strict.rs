#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use promsim_exporter::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
exporter:
  listen: "0.0.0.0:2115"
workload:
  interval_msec: 500 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "BAD_CONFIG");
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
version: 1
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.exporter.listen, "0.0.0.0:2115");
    assert_eq!(cfg.exporter.metrics_path, "/metrics");
    assert_eq!(cfg.workload.interval_ms, 1000);
    assert_eq!((cfg.workload.latency_min_ms, cfg.workload.latency_max_ms), (100, 999));
    assert_eq!(cfg.workload.endpoints.len(), 3);
    assert_eq!(cfg.workload.endpoints[1].method, "POST");
    assert_eq!(cfg.workload.endpoints[1].path, "/login");
    assert_eq!(cfg.workload.buckets.len(), 11);
}

#[test]
fn custom_endpoints_and_buckets() {
    let ok = r#"
version: 1
workload:
  interval_ms: 250
  buckets: [0.1, 0.2, 0.4]
  endpoints:
    - { method: DELETE, path: /sessions }
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.workload.interval().as_millis(), 250);
    assert_eq!(cfg.workload.histogram_buckets().unwrap().bounds(), &[0.1, 0.2, 0.4]);
    assert_eq!(cfg.workload.endpoints, vec![config::EndpointSpec::new("DELETE", "/sessions")]);
}

#[test]
fn rejects_out_of_range_values() {
    let cases = [
        "version: 2\n",
        "version: 1\nexporter: { listen: \"not-an-addr\" }\n",
        "version: 1\nexporter: { metrics_path: \"metrics\" }\n",
        "version: 1\nexporter: { metrics_path: \"/healthz\" }\n",
        "version: 1\nworkload: { interval_ms: 0 }\n",
        "version: 1\nworkload: { latency_min_ms: 500, latency_max_ms: 100 }\n",
        "version: 1\nworkload: { latency_max_ms: 120000 }\n",
        "version: 1\nworkload: { endpoints: [] }\n",
        "version: 1\nworkload: { endpoints: [ { method: GET, path: users } ] }\n",
        "version: 1\nworkload: { buckets: [1.0, 0.5] }\n",
        "version: 1\nworkload: { buckets: [] }\n",
    ];
    for c in cases {
        let err = config::load_from_str(c).expect_err(c);
        assert_eq!(err.code().as_str(), "BAD_CONFIG", "case={c}");
    }
}

#[test]
fn missing_explicit_file_is_internal_error() {
    let err = config::load_from_file("does/not/exist.yaml").expect_err("must fail");
    assert_eq!(err.code().as_str(), "INTERNAL");
}
