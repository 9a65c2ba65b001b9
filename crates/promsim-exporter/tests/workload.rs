#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use tokio::sync::watch;

use promsim_core::MetricFamily;
use promsim_exporter::app_state::AppState;
use promsim_exporter::config;
use promsim_exporter::obs::metrics::{APP_CONCURRENT_REQUESTS, APP_REQUESTS_TOTAL, APP_REQUEST_DURATION_SECONDS};

fn fast_state(latency: &str) -> AppState {
    let yaml = format!(
        r#"
version: 1
workload:
  interval_ms: 10
  {latency}
"#
    );
    AppState::new(config::load_from_str(&yaml).unwrap()).unwrap()
}

fn family<'a>(families: &'a [MetricFamily], name: &str) -> &'a MetricFamily {
    families.iter().find(|f| f.name() == name).unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn three_ticks_over_three_endpoints_record_nine_requests() {
    let state = fast_state("latency_min_ms: 1\n  latency_max_ms: 5");

    let launched = state.simulator().run_ticks(3).await;
    assert_eq!(launched, 9);

    let families = state.registry().gather();

    let requests = family(&families, APP_REQUESTS_TOTAL);
    let total: f64 = requests.samples.iter().map(|s| s.value.as_scalar().unwrap()).sum();
    assert_eq!(total, 9.0);
    assert_eq!(requests.samples.len(), 3);
    for s in &requests.samples {
        assert_eq!(s.label_values[2], "200");
        assert_eq!(s.value.as_scalar(), Some(3.0));
    }
    assert!(requests.sample(&["POST", "/login", "200"]).is_some());

    let in_flight = family(&families, APP_CONCURRENT_REQUESTS);
    assert_eq!(in_flight.sample(&[]).unwrap().value.as_scalar(), Some(0.0));

    let latency = family(&families, APP_REQUEST_DURATION_SECONDS);
    let observed: u64 = latency
        .samples
        .iter()
        .map(|s| s.value.as_histogram().unwrap().count)
        .sum();
    assert_eq!(observed, 9);
    for s in &latency.samples {
        let h = s.value.as_histogram().unwrap();
        assert!(h.is_cumulative());
        assert!(h.sum >= 0.001 * h.count as f64, "each request slept at least 1ms");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn shutdown_aborts_in_flight_requests_and_restores_gauge() {
    let state = fast_state("latency_min_ms: 30000\n  latency_max_ms: 30000");
    let metrics = state.metrics();

    let (stop_tx, stop_rx) = watch::channel(false);
    let simulator = state.simulator();
    let handle = tokio::spawn(async move { simulator.run(stop_rx).await });

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(metrics.in_flight() >= 3.0, "requests should be sleeping");

    stop_tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("simulator must stop promptly")
        .unwrap();

    assert_eq!(metrics.in_flight(), 0.0);
    let families = state.registry().gather();
    assert!(family(&families, APP_REQUESTS_TOTAL).samples.is_empty());
}

#[tokio::test]
async fn dropping_the_shutdown_sender_stops_the_loop() {
    let state = fast_state("latency_min_ms: 1\n  latency_max_ms: 2");
    let (stop_tx, stop_rx) = watch::channel(false);
    let simulator = state.simulator();
    let handle = tokio::spawn(async move { simulator.run(stop_rx).await });

    drop(stop_tx);
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("simulator must stop")
        .unwrap();
}
