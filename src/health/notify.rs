//! Notification seam for check outcomes.
//!
//! The engine pushes every completed result (and critical failures
//! separately) through this trait. Deployments decide what happens with
//! them: export metrics, page someone, or nothing at all.

use super::CheckResult;

/// Observer for check outcomes.
///
/// Called synchronously from the engine after each execution; implementations
/// should be cheap and must not block.
pub trait CheckNotifier: Send + Sync {
    /// Called with every completed result, healthy or not.
    fn on_check_result(&self, result: &CheckResult);

    /// Called when a critical check has exhausted its attempts.
    fn on_critical_failure(&self, name: &str, error: &str);
}

/// Default notifier: discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl CheckNotifier for NoopNotifier {
    fn on_check_result(&self, _result: &CheckResult) {}

    fn on_critical_failure(&self, _name: &str, _error: &str) {}
}
