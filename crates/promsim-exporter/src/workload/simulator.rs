//! Workload simulator.
//!
//! Once per interval, one simulated request is launched for every configured
//! (method, endpoint) pair. Requests run concurrently as tasks in a `JoinSet`
//! owned by the loop, so stopping the loop also aborts and awaits every
//! request still in flight.
//!
//! Every request currently succeeds with status "200". Other outcomes would
//! be recorded through the same `status` label; no error-rate policy exists.

use std::ops::RangeInclusive;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::{JoinError, JoinSet};
use tokio::time::{Duration, Instant, MissedTickBehavior};

use crate::config::{EndpointSpec, WorkloadSection};
use crate::obs::AppMetrics;

/// Status recorded for every simulated request.
pub const STATUS_OK: &str = "200";

pub struct WorkloadSimulator {
    metrics: Arc<AppMetrics>,
    endpoints: Arc<[EndpointSpec]>,
    interval: Duration,
    latency_ms: RangeInclusive<u64>,
}

impl WorkloadSimulator {
    pub fn new(cfg: &WorkloadSection, metrics: Arc<AppMetrics>) -> Self {
        Self {
            metrics,
            endpoints: cfg.endpoints.clone().into(),
            interval: cfg.interval(),
            latency_ms: cfg.latency_min_ms..=cfg.latency_max_ms,
        }
    }

    /// Run until `shutdown` flips to `true` (or its sender is dropped), then
    /// abort in-flight requests and wait for them to unwind.
    pub async fn run(&self, shutdown: watch::Receiver<bool>) {
        tracing::info!(
            interval_ms = self.interval.as_millis() as u64,
            endpoints = self.endpoints.len(),
            "workload simulator started"
        );
        let ticks = self.drive(None, Some(shutdown)).await;
        tracing::info!(ticks, "workload simulator stopped");
    }

    /// Run exactly `ticks` ticks, then wait for every launched request to
    /// finish. Returns the number of requests launched.
    pub async fn run_ticks(&self, ticks: u64) -> u64 {
        self.drive(Some(ticks), None).await * self.endpoints.len() as u64
    }

    async fn drive(&self, limit: Option<u64>, mut shutdown: Option<watch::Receiver<bool>>) -> u64 {
        let mut tick = tokio::time::interval(self.interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut in_flight: JoinSet<()> = JoinSet::new();
        let mut ticks = 0u64;

        loop {
            if limit.is_some_and(|n| ticks >= n) {
                break;
            }

            tokio::select! {
                _ = tick.tick() => {
                    self.launch_tick(&mut in_flight);
                    ticks += 1;
                }

                // reap finished requests so the set stays small
                Some(res) = in_flight.join_next(), if !in_flight.is_empty() => {
                    log_join(res);
                }

                _ = shutdown_requested(&mut shutdown) => {
                    tracing::info!(in_flight = in_flight.len(), "workload shutdown, aborting in-flight requests");
                    in_flight.shutdown().await;
                    return ticks;
                }
            }
        }

        while let Some(res) = in_flight.join_next().await {
            log_join(res);
        }
        ticks
    }

    fn launch_tick(&self, in_flight: &mut JoinSet<()>) {
        for ep in self.endpoints.iter() {
            let latency = Duration::from_millis(rand::random_range(self.latency_ms.clone()));
            in_flight.spawn(simulate_request(
                Arc::clone(&self.metrics),
                ep.clone(),
                latency,
            ));
        }
    }
}

/// One simulated request: in flight for `latency`, then recorded.
async fn simulate_request(metrics: Arc<AppMetrics>, ep: EndpointSpec, latency: Duration) {
    let _in_flight = metrics.track_in_flight();

    let start = Instant::now();
    tokio::time::sleep(latency).await;
    let elapsed = start.elapsed();

    if let Err(e) = metrics.record_request(&ep.method, &ep.path, STATUS_OK, elapsed) {
        tracing::warn!(method = %ep.method, endpoint = %ep.path, error = %e, "failed to record request");
        return;
    }
    tracing::trace!(method = %ep.method, endpoint = %ep.path, elapsed_ms = elapsed.as_millis() as u64, "request done");
}

/// Resolves once shutdown is signalled. Never resolves without a receiver.
async fn shutdown_requested(rx: &mut Option<watch::Receiver<bool>>) {
    let Some(rx) = rx else {
        return std::future::pending().await;
    };
    // A dropped sender means the owner is gone; stop as well.
    let _ = rx.wait_for(|stop| *stop).await;
}

fn log_join(res: Result<(), JoinError>) {
    if let Err(e) = res {
        if e.is_panic() {
            tracing::warn!(error = %e, "simulated request panicked");
        }
    }
}
