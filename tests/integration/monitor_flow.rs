//! Driver-level tests: startup verification and the periodic monitor.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use healthgate::health::{CheckOptions, CheckStatus, HealthCheckRegistry};
use healthgate::monitor::{perform_startup_health_check, start_periodic_health_checks};

#[tokio::test]
async fn test_startup_check_allows_degraded_boot() {
    let registry = Arc::new(HealthCheckRegistry::new());
    registry.register("database", CheckOptions::default(), || async {
        Err("connection refused".into())
    });
    registry.register(
        "telemetry",
        CheckOptions::default().with_critical(false),
        || async { Ok(None) },
    );

    // A failing critical check degrades the boot, it does not abort it.
    perform_startup_health_check(&registry, false)
        .await
        .expect("startup should continue in degraded mode");

    let result = registry
        .get_check_result("database")
        .expect("sweep should store the failing result");
    assert_eq!(result.status, CheckStatus::Unhealthy);
    assert_eq!(result.error.as_deref(), Some("connection refused"));
}

#[tokio::test]
async fn test_periodic_monitor_sweeps_and_stops() {
    let registry = Arc::new(HealthCheckRegistry::new());
    let runs = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&runs);
    registry.register("database", CheckOptions::default(), move || {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Some(json!({"pool": "ok"})))
        }
    });

    let handle = start_periodic_health_checks(Arc::clone(&registry), Duration::from_millis(25));

    tokio::time::sleep(Duration::from_millis(95)).await;
    let seen = runs.load(Ordering::SeqCst);
    assert!(seen >= 2, "expected at least two sweeps, saw {}", seen);

    // Sweeps populate the stored-result map.
    let results = registry.get_all_results();
    assert_eq!(results["database"].status, CheckStatus::Healthy);

    handle.stop();
    tokio::time::sleep(Duration::from_millis(80)).await;
    let after_stop = runs.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(80)).await;
    assert_eq!(
        runs.load(Ordering::SeqCst),
        after_stop,
        "monitor kept sweeping after stop"
    );
}

#[tokio::test]
async fn test_monitor_keeps_going_when_a_check_stays_red() {
    let registry = Arc::new(HealthCheckRegistry::new());
    let runs = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&runs);
    registry.register(
        "flaky",
        CheckOptions::default().with_timeout(Duration::from_millis(200)),
        move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err("still down".into())
            }
        },
    );

    let handle = start_periodic_health_checks(Arc::clone(&registry), Duration::from_millis(25));
    tokio::time::sleep(Duration::from_millis(95)).await;
    handle.stop();

    // Failures are recorded and the loop keeps its cadence.
    assert!(runs.load(Ordering::SeqCst) >= 2);
    let result = registry.get_check_result("flaky").expect("stored result");
    assert_eq!(result.status, CheckStatus::Unhealthy);
}
