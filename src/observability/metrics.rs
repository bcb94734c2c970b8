//! Prometheus metrics for healthgate.
//!
//! One metric family per check outcome dimension: result counts by status,
//! execution latency, attempts used, and critical failures.

use prometheus::{
    CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};

use crate::health::{CheckNotifier, CheckResult};

/// Prometheus metrics registry wired to the health engine.
///
/// Implements [`CheckNotifier`], so it can be injected straight into
/// `HealthCheckRegistry::with_notifier`.
pub struct MetricsNotifier {
    registry: Registry,

    /// Check executions by check name and final status
    pub checks_total: CounterVec,

    /// Duration in seconds of the attempt that settled each check
    pub check_duration_seconds: HistogramVec,

    /// Attempts used per execution
    pub check_attempts: HistogramVec,

    /// Critical checks that exhausted their attempts
    pub critical_failures_total: CounterVec,
}

impl MetricsNotifier {
    /// Create the metrics registry with all metric families.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // Check latency buckets (in seconds): probes range from sub-10ms TCP
        // connects to multi-second upstream calls
        let latency_buckets = vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0];

        // Attempt buckets: retries are small integers
        let attempt_buckets = vec![1.0, 2.0, 3.0, 4.0, 5.0];

        let checks_total = CounterVec::new(
            Opts::new("healthgate_checks_total", "Total check executions"),
            &["check", "status"],
        )?;
        registry.register(Box::new(checks_total.clone()))?;

        let check_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "healthgate_check_duration_seconds",
                "Check execution duration in seconds",
            )
            .buckets(latency_buckets),
            &["check"],
        )?;
        registry.register(Box::new(check_duration_seconds.clone()))?;

        let check_attempts = HistogramVec::new(
            HistogramOpts::new(
                "healthgate_check_attempts",
                "Attempts used per check execution",
            )
            .buckets(attempt_buckets),
            &["check"],
        )?;
        registry.register(Box::new(check_attempts.clone()))?;

        let critical_failures_total = CounterVec::new(
            Opts::new(
                "healthgate_critical_failures_total",
                "Critical checks that exhausted their attempts",
            ),
            &["check"],
        )?;
        registry.register(Box::new(critical_failures_total.clone()))?;

        Ok(Self {
            registry,
            checks_total,
            check_duration_seconds,
            check_attempts,
            critical_failures_total,
        })
    }

    /// Export metrics in Prometheus text format.
    pub fn export(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .expect("Failed to encode metrics");
        String::from_utf8(buffer).expect("Invalid UTF-8 in metrics")
    }

    /// Get the Prometheus registry (for custom metrics).
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl Default for MetricsNotifier {
    fn default() -> Self {
        Self::new().expect("Failed to create metrics")
    }
}

impl CheckNotifier for MetricsNotifier {
    fn on_check_result(&self, result: &CheckResult) {
        self.checks_total
            .with_label_values(&[&result.name, &result.status.to_string()])
            .inc();

        if let Some(duration_ms) = result.duration_ms {
            self.check_duration_seconds
                .with_label_values(&[&result.name])
                .observe(duration_ms as f64 / 1000.0);
        }

        if let Some(attempts) = result.attempts {
            self.check_attempts
                .with_label_values(&[&result.name])
                .observe(attempts as f64);
        }
    }

    fn on_critical_failure(&self, name: &str, _error: &str) {
        self.critical_failures_total
            .with_label_values(&[name])
            .inc();
    }
}
