//! Built-in dependency probes.
//!
//! Probes are reusable execution backends behind registered checks. The
//! binary wires the configured probe set into the registry at startup;
//! anything bespoke is registered directly as a closure check.
//!
//! | Probe | Use | Registered as |
//! |-------|-----|---------------|
//! | [`TcpProbe`] | Port-level reachability of datastores | critical |
//! | [`HttpProbe`] | Upstream service endpoints | non-critical |
//! | [`SystemProbe`] | Local load and memory pressure | non-critical |

mod http;
mod system;
mod tcp;

pub use http::HttpProbe;
pub use system::{SystemProbe, SystemSnapshot};
pub use tcp::TcpProbe;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::ProbesConfig;
use crate::health::{CheckError, CheckOptions, HealthCheckRegistry};

/// Trait for dependency probe backends.
///
/// A probe is one attempt against a dependency; the registry runs it through
/// the normal timeout/retry machinery like any closure check.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Probe the dependency once.
    ///
    /// Resolves with optional structured details; any error marks the
    /// attempt failed.
    async fn run(&self) -> Result<Option<serde_json::Value>, CheckError>;

    /// Probe kind for logging and dependency metadata.
    fn kind(&self) -> &'static str;

    /// Human-readable probe target.
    fn target(&self) -> String;
}

/// Register a probe as a named check, plus a dependency metadata entry for
/// the discovery surface.
pub fn register_probe(
    registry: &HealthCheckRegistry,
    name: impl Into<String>,
    probe: Arc<dyn Probe>,
    options: CheckOptions,
) {
    let name = name.into();
    registry.register_dependency(
        &name,
        serde_json::json!({
            "kind": probe.kind(),
            "target": probe.target(),
            "critical": options.critical,
            "tags": options.tags.clone(),
        }),
    );
    registry.register(name, options, move || {
        let probe = Arc::clone(&probe);
        async move { probe.run().await }
    });
}

/// Wire the configured probe set into the registry.
///
/// TCP targets are treated as datastores: critical, with retries. HTTP
/// targets are upstream services: non-critical, single attempt by default.
/// The system probe watches local memory pressure.
pub fn register_probes(registry: &HealthCheckRegistry, config: &ProbesConfig) {
    for (name, addr) in &config.tcp {
        register_probe(
            registry,
            name,
            Arc::new(TcpProbe::new(addr.clone())),
            CheckOptions::default()
                .with_timeout(config.tcp_timeout)
                .with_retries(config.tcp_retries)
                .with_tags(vec!["datastore".to_string()]),
        );
    }

    for (name, url) in &config.http {
        register_probe(
            registry,
            name,
            Arc::new(HttpProbe::new(url.clone())),
            CheckOptions::default()
                .with_timeout(config.http_timeout)
                .with_retries(config.http_retries)
                .with_critical(false)
                .with_tags(vec!["upstream".to_string()]),
        );
    }

    if config.system {
        register_probe(
            registry,
            "system_resources",
            Arc::new(SystemProbe::new(config.memory_limit_percent)),
            CheckOptions::default()
                .with_timeout(Duration::from_secs(2))
                .with_critical(false)
                .with_tags(vec!["system".to_string()]),
        );
    }
}
