//! healthgate - Health check orchestration service powered by Rust and Tokio.
//!
//! This crate monitors a fleet of dependencies (datastores, upstream HTTP
//! services, local system resources) through a registry of async health
//! checks and serves the results over HTTP.
//!
//! # Features
//!
//! - **Check Registry**: Named async checks with per-check timeout, retry
//!   budget, and criticality
//! - **Sequential Sweeps**: One-shot startup verification plus a periodic
//!   background monitor with a stop handle
//! - **HTTP Surface**: `/health`, `/health/{name}`, `/dependencies`, and
//!   Prometheus `/metrics`
//! - **Pluggable Notifiers**: Check outcomes fan out to a [`CheckNotifier`]
//!   implementation (metrics recorder by default)
//! - **Structured Logging**: JSON or text output with tracing
//!
//! # Example
//!
//! ```rust,ignore
//! use healthgate::health::{CheckOptions, HealthCheckRegistry};
//!
//! let registry = HealthCheckRegistry::new();
//! registry.register("database", CheckOptions::default(), || async {
//!     Ok(Some(serde_json::json!({"pool": "ok"})))
//! });
//! let report = registry.execute_all_checks().await;
//! assert!(report.is_healthy());
//! ```
//!
//! [`CheckNotifier`]: health::CheckNotifier

/// Package version from Cargo.toml
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git commit hash (8 chars) with optional "-dirty" suffix
pub const BUILD_VERSION: &str = env!("BUILD_VERSION");

/// Full version string: "0.1.0 (abc12345)" or "0.1.0 (abc12345-dirty)"
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_VERSION"), ")");

pub mod config;
pub mod health;
pub mod logging;
pub mod monitor;
pub mod observability;
pub mod probes;
pub mod server;

// Re-exports for convenience
pub use config::Config;
pub use health::{CheckOptions, CheckResult, HealthCheckRegistry};
pub use monitor::MonitorHandle;
