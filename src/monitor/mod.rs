//! Startup and periodic health-check drivers.
//!
//! Two entry points sit on top of the registry:
//!
//! - [`perform_startup_health_check`] runs one sweep during boot and decides
//!   between normal startup, degraded startup (critical checks failing) and
//!   a fatal startup fault.
//! - [`start_periodic_health_checks`] runs a sweep on a fixed cadence in a
//!   background task and returns a [`MonitorHandle`] to cancel it.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::health::{panic_message, AggregateReport, HealthCheckRegistry};

/// Errors from the startup driver.
#[derive(Debug)]
pub enum StartupError {
    /// The sweep itself failed before producing a report.
    Sweep(String),
}

impl std::fmt::Display for StartupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartupError::Sweep(msg) => write!(f, "startup health check sweep failed: {}", msg),
        }
    }
}

impl std::error::Error for StartupError {}

/// Run the one-shot startup verification.
///
/// Critical failures do not abort startup: they are logged and the service
/// continues in limited mode. Only a fault in the sweep itself is fatal; in
/// production it terminates the process with exit code 1, everywhere else it
/// is propagated to the caller.
pub async fn perform_startup_health_check(
    registry: &HealthCheckRegistry,
    production: bool,
) -> Result<AggregateReport, StartupError> {
    info!("performing startup health check");

    let report = match run_guarded_sweep(registry).await {
        Ok(report) => report,
        Err(msg) => {
            error!(error = %msg, "startup health check failed");
            if production {
                std::process::exit(1);
            }
            return Err(StartupError::Sweep(msg));
        }
    };

    let critical_failures: Vec<&str> = report
        .results
        .iter()
        .filter(|r| !r.is_healthy() && registry.is_critical(&r.name))
        .map(|r| r.name.as_str())
        .collect();

    if critical_failures.is_empty() {
        info!(
            total = report.counts.total,
            healthy = report.counts.healthy,
            "startup health check passed"
        );
    } else {
        error!(
            checks = ?critical_failures,
            "critical health checks failed during startup"
        );
        warn!("continuing in limited mode, some features may be unavailable");
    }

    Ok(report)
}

/// Handle for the periodic monitor.
///
/// Dropping the handle without calling [`MonitorHandle::stop`] leaves the
/// monitor running for the life of the process, like a plain fire-and-forget
/// interval.
pub struct MonitorHandle {
    stop_tx: watch::Sender<bool>,
}

impl MonitorHandle {
    /// Stop the periodic loop. Idempotent.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    /// True once stop was requested.
    pub fn is_stopped(&self) -> bool {
        *self.stop_tx.borrow()
    }
}

/// Start the background monitor: one full sweep every `interval`, first
/// sweep one interval after the call.
///
/// Sweep outcomes are logged; a sweep fault is logged and the loop keeps
/// going. The returned handle cancels the loop.
pub fn start_periodic_health_checks(
    registry: Arc<HealthCheckRegistry>,
    interval: Duration,
) -> MonitorHandle {
    let (stop_tx, mut stop_rx) = watch::channel(false);

    tokio::spawn(async move {
        info!(
            interval_ms = interval.as_millis() as u64,
            "periodic health checks started"
        );
        let mut ticker =
            tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        // A sweep that overruns the interval delays the next tick instead of
        // firing catch-up sweeps back to back.
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let mut watching = true;

        loop {
            tokio::select! {
                _ = ticker.tick() => run_sweep_once(&registry).await,
                changed = stop_rx.changed(), if watching => match changed {
                    Ok(()) => {
                        if *stop_rx.borrow() {
                            info!("periodic health checks stopped");
                            break;
                        }
                    }
                    // Handle dropped without stop(): keep running detached.
                    Err(_) => watching = false,
                },
            }
        }
    });

    MonitorHandle { stop_tx }
}

/// One monitored sweep for the periodic loop.
async fn run_sweep_once(registry: &HealthCheckRegistry) {
    match run_guarded_sweep(registry).await {
        Ok(report) => {
            if report.counts.unhealthy > 0 || report.counts.errors > 0 {
                warn!(
                    unhealthy = report.counts.unhealthy,
                    errors = report.counts.errors,
                    "periodic health check detected issues"
                );
            }
        }
        Err(msg) => error!(error = %msg, "periodic health check failed"),
    }
}

/// Run a sweep, converting a panic out of the aggregate path into an error
/// message instead of unwinding into the driver.
async fn run_guarded_sweep(registry: &HealthCheckRegistry) -> Result<AggregateReport, String> {
    AssertUnwindSafe(registry.execute_all_checks())
        .catch_unwind()
        .await
        .map_err(panic_message)
}
