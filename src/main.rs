use std::sync::Arc;

use tracing::{info, warn};

use healthgate::config::Config;
use healthgate::health::{CheckNotifier, HealthCheckRegistry};
use healthgate::logging;
use healthgate::monitor::{perform_startup_health_check, start_periodic_health_checks};
use healthgate::observability::MetricsNotifier;
use healthgate::probes::register_probes;
use healthgate::server::run_server;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if std::env::args().any(|arg| arg == "--version" || arg == "-V") {
        println!("healthgate {}", healthgate::VERSION);
        return Ok(());
    }

    let config = Config::from_env()?;
    logging::init(&config.logging);

    // Checks are I/O bound and run sequentially; one thread is enough.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(config))
}

async fn async_main(config: Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Starting healthgate {}...", healthgate::VERSION);
    config.log_summary();

    let metrics = Arc::new(MetricsNotifier::new()?);
    let notifier: Arc<dyn CheckNotifier> = Arc::clone(&metrics) as _;
    let registry = Arc::new(HealthCheckRegistry::with_notifier(notifier));

    register_probes(&registry, &config.probes);

    if config.monitor.startup_check {
        if config.monitor.is_production() {
            // Production never blocks serving on the startup sweep.
            let startup_registry = Arc::clone(&registry);
            tokio::spawn(async move {
                if let Err(e) = perform_startup_health_check(&startup_registry, true).await {
                    warn!("Startup health check failed, continuing startup: {}", e);
                }
            });
        } else {
            perform_startup_health_check(&registry, false).await?;
        }
    }

    let monitor = config
        .monitor
        .interval
        .map(|interval| start_periodic_health_checks(Arc::clone(&registry), interval));

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    tokio::select! {
        result = run_server(config.server.listen_addr, Arc::clone(&registry), metrics, shutdown_rx) => {
            if let Err(e) = result {
                eprintln!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down...");
        }
    }

    // Cleanup
    if let Some(handle) = monitor {
        handle.stop();
    }
    let _ = shutdown_tx.send(true);

    Ok(())
}
