//! Axum router wiring.
//!
//! Exposes the ops endpoints and the scrape endpoint at the configured path.

use axum::{routing::get, Router};

use crate::{app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    let metrics_path = state.cfg().exporter.metrics_path.clone();
    Router::new()
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route(&metrics_path, get(ops::metrics))
        .with_state(state)
}
