#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use axum::body::to_bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;

use promsim_core::expo::text;
use promsim_exporter::app_state::AppState;
use promsim_exporter::collector::RuntimeCollector;
use promsim_exporter::config::{self, ExporterConfig};
use promsim_exporter::instruments::CounterVec;
use promsim_exporter::registry::Registry;
use promsim_exporter::{ops, router};

#[tokio::test]
async fn counter_and_runtime_families_in_one_scrape() {
    let registry = Registry::new();
    let requests = Arc::new(CounterVec::new("requests_total", "Total requests", &[]).unwrap());
    registry.register(requests.clone()).unwrap();
    registry.register(Arc::new(RuntimeCollector::new().unwrap())).unwrap();

    let counter = requests.with_label_values(&[]).unwrap();
    for _ in 0..5 {
        counter.inc();
    }

    let families = registry.gather();
    assert_eq!(families.len(), 5);
    assert_eq!(families[0].sample(&[]).unwrap().value.as_scalar(), Some(5.0));

    for f in &families[1..] {
        assert!(!f.samples.is_empty());
        for s in &f.samples {
            assert!(s.value.as_scalar().unwrap() >= 0.0);
        }
    }

    let body = text::encode(&families);
    assert!(body.contains("# TYPE requests_total counter\nrequests_total 5\n"), "{body}");
    assert!(body.contains("system_memory_usage_bytes{type=\"heap_sys\"}"));
    assert!(body.contains("system_load_factor{component=\"cpu_load\"}"));
    assert!(body.contains("\nsystem_tasks_count "));
    assert!(body.contains("\nlast_processed_timestamp "));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn scrape_during_concurrent_increments_sees_valid_counts() {
    let registry = Arc::new(Registry::new());
    let family = Arc::new(CounterVec::new("inflight_total", "i", &["lane"]).unwrap());
    registry.register(family.clone()).unwrap();

    let mut writers = Vec::new();
    for i in 0..100 {
        let family = Arc::clone(&family);
        writers.push(tokio::spawn(async move {
            tokio::task::yield_now().await;
            let lane = if i % 2 == 0 { "even" } else { "odd" };
            family.with_label_values(&[lane]).unwrap().inc();
        }));
    }

    for _ in 0..50 {
        for f in registry.gather() {
            for s in &f.samples {
                let v = s.value.as_scalar().unwrap();
                assert!((0.0..=50.0).contains(&v), "torn value {v}");
                assert_eq!(v.fract(), 0.0);
            }
        }
        tokio::task::yield_now().await;
    }

    for w in writers {
        w.await.unwrap();
    }
    let families = registry.gather();
    let total: f64 = families[0].samples.iter().map(|s| s.value.as_scalar().unwrap()).sum();
    assert_eq!(total, 100.0);
}

#[tokio::test]
async fn metrics_handler_serves_text_exposition() {
    let state = AppState::new(ExporterConfig::default()).unwrap();
    state.metrics().record_request("GET", "/users", "200", std::time::Duration::from_millis(120)).unwrap();

    let resp = ops::metrics(State(state.clone())).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        text::CONTENT_TYPE
    );

    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = String::from_utf8(body.to_vec()).unwrap();
    assert!(body.contains("# TYPE app_requests_total counter"));
    assert!(body.contains("app_requests_total{method=\"GET\",endpoint=\"/users\",status=\"200\"} 1"));
    assert!(body.contains(
        "app_request_duration_seconds_bucket{method=\"GET\",endpoint=\"/users\",le=\"0.25\"} 1"
    ));
    assert!(body.contains(
        "app_request_duration_seconds_bucket{method=\"GET\",endpoint=\"/users\",le=\"0.1\"} 0"
    ));
    assert!(body.contains("\napp_concurrent_requests 0\n"));
    assert!(body.contains("# TYPE system_load_factor gauge"));
}

#[tokio::test]
async fn readiness_flips_when_draining() {
    let state = AppState::new(ExporterConfig::default()).unwrap();
    let ready = ops::readyz(State(state.clone())).await.into_response();
    assert_eq!(ready.status(), StatusCode::OK);

    state.set_draining();
    let draining = ops::readyz(State(state.clone())).await.into_response();
    assert_eq!(draining.status(), StatusCode::SERVICE_UNAVAILABLE);

    let health = ops::healthz().await.into_response();
    assert_eq!(health.status(), StatusCode::OK);
}

#[test]
fn router_accepts_custom_metrics_path() {
    let cfg = config::load_from_str("version: 1\nexporter: { metrics_path: \"/stats\" }\n").unwrap();
    let state = AppState::new(cfg).unwrap();
    let _app = router::build_router(state);
}
