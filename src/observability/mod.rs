//! Observability: Prometheus metrics for check outcomes.
//!
//! The [`MetricsNotifier`] plugs into the health engine's notifier seam and
//! turns every check result into counter/histogram updates; the `/metrics`
//! route exports them in Prometheus text format.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use healthgate::health::HealthCheckRegistry;
//! use healthgate::observability::MetricsNotifier;
//!
//! let metrics = Arc::new(MetricsNotifier::new()?);
//! let registry = HealthCheckRegistry::with_notifier(metrics.clone());
//! // ... run sweeps ...
//! println!("{}", metrics.export());
//! ```

pub mod metrics;

pub use metrics::MetricsNotifier;
