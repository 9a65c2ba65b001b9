//! promsim exporter
//!
//! - Scrape endpoint (default `/metrics`) in Prometheus text format
//! - Runtime signals computed on demand per scrape
//! - Background workload mutating request counters and latency histograms
//! - Graceful shutdown on Ctrl-C: readiness flips, workload drains

use tokio::sync::watch;
use tracing_subscriber::{fmt, EnvFilter};

use promsim_core::error::{PromError, Result};
use promsim_exporter::alloc::TrackingAllocator;
use promsim_exporter::{app_state, config, router};

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(code = e.code().as_str(), error = %e, "promsim-exporter failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cfg = config::load_from_env()?;
    let listen = cfg.exporter.listen_addr()?;

    let state = app_state::AppState::new(cfg)?;
    let app = router::build_router(state.clone());

    let (stop_tx, stop_rx) = watch::channel(false);
    let simulator = state.simulator();
    let workload = tokio::spawn(async move { simulator.run(stop_rx).await });

    tracing::info!(%listen, metrics_path = %state.cfg().exporter.metrics_path, "promsim-exporter starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| PromError::Internal(format!("bind {listen} failed: {e}")))?;

    let drain_state = state.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown requested, draining");
            drain_state.set_draining();
            let _ = stop_tx.send(true);
        })
        .await
        .map_err(|e| PromError::Internal(format!("server failed: {e}")))?;

    if let Err(e) = workload.await {
        tracing::warn!(error = %e, "workload task ended abnormally");
    }
    Ok(())
}
