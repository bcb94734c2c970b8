//! Check definitions and per-check execution options.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

/// Error produced by a failing check attempt.
pub type CheckError = Box<dyn std::error::Error + Send + Sync>;

/// Future returned by a check function.
///
/// Resolves with optional structured details on success.
pub type CheckFuture =
    Pin<Box<dyn Future<Output = Result<Option<serde_json::Value>, CheckError>> + Send>>;

/// Boxed check function. Called once per attempt.
pub type CheckFn = Arc<dyn Fn() -> CheckFuture + Send + Sync>;

/// Per-check execution options.
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Upper bound for a single attempt. The attempt future is dropped when
    /// it fires.
    pub timeout: Duration,
    /// Critical checks escalate failures: error log plus notifier callback.
    pub critical: bool,
    /// Total number of attempts, not extra retries. Clamped to >= 1 at
    /// registration.
    pub retries: u32,
    /// Advisory cadence for external schedulers; the engine itself runs all
    /// checks on one shared interval.
    pub interval: Duration,
    /// Free-form labels for grouping and discovery.
    pub tags: Vec<String>,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            critical: true,
            retries: 1,
            interval: Duration::from_secs(30),
            tags: Vec::new(),
        }
    }
}

impl CheckOptions {
    /// Set the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Mark the check critical or not.
    pub fn with_critical(mut self, critical: bool) -> Self {
        self.critical = critical;
        self
    }

    /// Set the total attempt count.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Set the advisory interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Attach tags.
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

/// A registered check: name, function and resolved options.
#[derive(Clone)]
pub struct CheckDefinition {
    /// Unique check name; re-registering overwrites in place.
    pub name: String,
    /// The check function.
    pub check: CheckFn,
    /// Resolved execution options.
    pub options: CheckOptions,
}

impl fmt::Debug for CheckDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckDefinition")
            .field("name", &self.name)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
