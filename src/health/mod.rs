//! Health-check registry and execution engine.
//!
//! Named checks are registered with per-check timeout, retry count,
//! criticality and tags. The engine runs them individually or as a full
//! sweep, keeps the last result per check, and aggregates a report:
//!
//! - **Single execution**: up to `retries` attempts, each bounded by the
//!   check's timeout, no delay between attempts, first success wins.
//! - **Sweep**: every check in registration order, strictly sequential; one
//!   misbehaving check never stops the rest.
//! - **Notification**: every result (and critical failures separately) is
//!   pushed through the injected [`CheckNotifier`].
//!
//! # Example
//!
//! ```rust,ignore
//! use healthgate::health::{CheckOptions, HealthCheckRegistry};
//!
//! let registry = HealthCheckRegistry::new();
//! registry.register("database", CheckOptions::default().with_retries(2), || async {
//!     // probe the pool here
//!     Ok(Some(serde_json::json!({ "connections": 5 })))
//! });
//!
//! let report = registry.execute_all_checks().await;
//! assert!(report.is_healthy());
//! ```

mod check;
mod notify;
mod report;

pub use check::{CheckDefinition, CheckError, CheckFn, CheckFuture, CheckOptions};
pub use notify::{CheckNotifier, NoopNotifier};
pub use report::{now_rfc3339, AggregateReport, CheckCounts, CheckResult, CheckStatus};

use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use futures_util::FutureExt;
use tracing::{error, info, info_span, warn, Instrument};

/// Errors surfaced by registry operations.
#[derive(Debug)]
pub enum RegistryError {
    /// No check registered under the requested name.
    UnknownCheck(String),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::UnknownCheck(name) => write!(f, "health check '{}' not found", name),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Registry and execution engine for named health checks.
///
/// Internally three independent maps: ordered definitions, discovery-only
/// dependency metadata, and the last completed result per name. Each is
/// guarded by a plain [`RwLock`] held only for the access itself, never
/// across an await point; concurrent executions of the same check are
/// last-write-wins on the result map.
pub struct HealthCheckRegistry {
    /// Definitions in registration order. Re-registering replaces in place.
    checks: RwLock<Vec<CheckDefinition>>,
    /// Dependency metadata for discovery endpoints.
    dependencies: RwLock<HashMap<String, serde_json::Value>>,
    /// Most recent completed result per check name.
    last_results: RwLock<HashMap<String, CheckResult>>,
    /// Outcome observer.
    notifier: Arc<dyn CheckNotifier>,
}

impl Default for HealthCheckRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthCheckRegistry {
    /// Create a registry with the no-op notifier.
    pub fn new() -> Self {
        Self::with_notifier(Arc::new(NoopNotifier))
    }

    /// Create a registry pushing outcomes to the given notifier.
    pub fn with_notifier(notifier: Arc<dyn CheckNotifier>) -> Self {
        Self {
            checks: RwLock::new(Vec::new()),
            dependencies: RwLock::new(HashMap::new()),
            last_results: RwLock::new(HashMap::new()),
            notifier,
        }
    }

    /// Register (or overwrite) a named check.
    ///
    /// Overwriting keeps the check's original position in the sweep order;
    /// the attempt count is clamped to at least one.
    pub fn register<F, Fut>(&self, name: impl Into<String>, options: CheckOptions, check: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<serde_json::Value>, CheckError>> + Send + 'static,
    {
        let name = name.into();
        let mut options = options;
        options.retries = options.retries.max(1);

        let def = CheckDefinition {
            name: name.clone(),
            check: Arc::new(move || Box::pin(check()) as CheckFuture),
            options,
        };

        {
            let mut checks = self.checks.write().unwrap();
            match checks.iter_mut().find(|c| c.name == name) {
                Some(slot) => *slot = def,
                None => checks.push(def),
            }
        }

        info!(check = %name, "health check registered");
    }

    /// Record dependency metadata for discovery.
    ///
    /// Metadata entries are never executed and take no part in sweeps.
    pub fn register_dependency(&self, name: impl Into<String>, metadata: serde_json::Value) {
        let name = name.into();
        self.dependencies
            .write()
            .unwrap()
            .insert(name.clone(), metadata);

        info!(dependency = %name, "dependency registered");
    }

    /// Run a single check by name.
    ///
    /// Fails only when the name was never registered. The produced result is
    /// stored and pushed to the notifier before returning, on the failure
    /// path as well as the success path.
    pub async fn execute_check(&self, name: &str) -> Result<CheckResult, RegistryError> {
        let def = {
            let checks = self.checks.read().unwrap();
            checks.iter().find(|c| c.name == name).cloned()
        }
        .ok_or_else(|| RegistryError::UnknownCheck(name.to_string()))?;

        let span = info_span!("health_check", check = %def.name, critical = def.options.critical);
        let result = self.run_attempts(&def).instrument(span).await;

        Ok(self.finish(&def, result))
    }

    /// Run every registered check sequentially, in registration order.
    ///
    /// A panic escaping a single execution is caught and recorded as a
    /// result with [`CheckStatus::Error`]; it neither aborts the rest of the
    /// sweep nor overwrites that check's stored last result. Never fails: an
    /// empty registry yields an empty healthy report.
    pub async fn execute_all_checks(&self) -> AggregateReport {
        let names = self.check_names();
        let started = Instant::now();
        let mut results = Vec::with_capacity(names.len());

        for name in &names {
            let outcome = AssertUnwindSafe(self.execute_check(name))
                .catch_unwind()
                .await;
            let result = match outcome {
                Ok(Ok(result)) => result,
                Ok(Err(err)) => CheckResult::fault(name, err.to_string()),
                Err(panic) => CheckResult::fault(name, panic_message(panic)),
            };
            results.push(result);
        }

        let report = AggregateReport::from_results(results, started.elapsed().as_millis() as u64);
        info!(
            total = report.counts.total,
            healthy = report.counts.healthy,
            unhealthy = report.counts.unhealthy,
            errors = report.counts.errors,
            duration_ms = report.duration_ms,
            "health check summary"
        );

        report
    }

    /// Most recent stored result for a check, if it ever completed.
    pub fn get_check_result(&self, name: &str) -> Option<CheckResult> {
        self.last_results.read().unwrap().get(name).cloned()
    }

    /// Snapshot of all stored results, keyed by check name.
    pub fn get_all_results(&self) -> HashMap<String, CheckResult> {
        self.last_results.read().unwrap().clone()
    }

    /// Registered check names in registration order.
    pub fn check_names(&self) -> Vec<String> {
        self.checks
            .read()
            .unwrap()
            .iter()
            .map(|c| c.name.clone())
            .collect()
    }

    /// Whether the named check is registered as critical. Unknown names are
    /// not critical.
    pub fn is_critical(&self, name: &str) -> bool {
        self.checks
            .read()
            .unwrap()
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.options.critical)
            .unwrap_or(false)
    }

    /// Snapshot of registered dependency metadata.
    pub fn dependencies(&self) -> HashMap<String, serde_json::Value> {
        self.dependencies.read().unwrap().clone()
    }

    /// The attempt loop: no backoff between attempts, first success wins.
    /// Duration covers only the attempt that settled the outcome.
    async fn run_attempts(&self, def: &CheckDefinition) -> CheckResult {
        let retries = def.options.retries;
        let timeout = def.options.timeout;
        let mut last_error = String::new();
        let mut last_duration_ms = 0u64;

        for attempt in 1..=retries {
            let started = Instant::now();
            match tokio::time::timeout(timeout, (def.check)()).await {
                Ok(Ok(details)) => {
                    let duration_ms = started.elapsed().as_millis() as u64;
                    let details = details.unwrap_or_else(|| serde_json::json!({}));
                    return CheckResult::healthy(&def.name, details, duration_ms, attempt);
                }
                Ok(Err(err)) => last_error = err.to_string(),
                Err(_) => {
                    last_error = format!("health check timed out after {}ms", timeout.as_millis());
                }
            }
            last_duration_ms = started.elapsed().as_millis() as u64;

            if attempt < retries {
                warn!(check = %def.name, attempt, error = %last_error, "health check retry");
            }
        }

        CheckResult::unhealthy(&def.name, last_error, last_duration_ms, retries)
    }

    /// Store the result, escalate critical failures, notify.
    fn finish(&self, def: &CheckDefinition, result: CheckResult) -> CheckResult {
        if def.options.critical && result.status == CheckStatus::Unhealthy {
            let err = result.error.as_deref().unwrap_or("unknown error");
            error!(
                check = %def.name,
                error = %err,
                attempts = result.attempts.unwrap_or(0),
                "critical health check failed"
            );
            self.notifier.on_critical_failure(&def.name, err);
        }

        self.last_results
            .write()
            .unwrap()
            .insert(result.name.clone(), result.clone());
        self.notifier.on_check_result(&result);

        result
    }
}

/// Best-effort extraction of a panic payload message.
pub(crate) fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "check panicked".to_string()
    }
}
