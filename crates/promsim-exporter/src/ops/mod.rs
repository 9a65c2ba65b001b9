//! Operational HTTP endpoints.
//!
//! - `/healthz`       : liveness
//! - `/readyz`        : readiness (503 when draining)
//! - `<metrics_path>` : Prometheus text format

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use promsim_core::expo::text;

use crate::app_state::AppState;

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    if state.is_draining() {
        (StatusCode::SERVICE_UNAVAILABLE, "draining")
    } else {
        (StatusCode::OK, "ready")
    }
}

/// Gather and encode synchronously; nothing here awaits workload tasks.
pub async fn metrics(State(state): State<AppState>) -> Response {
    let families = state.registry().gather();
    let body = text::encode(&families);

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, text::CONTENT_TYPE)],
        body,
    )
        .into_response()
}
