//! Check results and the aggregate sweep report.

use serde::Serialize;

/// Outcome classification for a single execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// The check resolved within its attempt budget.
    Healthy,
    /// Every attempt failed or timed out.
    Unhealthy,
    /// The orchestration itself faulted (panicking check, engine error).
    Error,
}

impl CheckStatus {
    /// Returns true for [`CheckStatus::Healthy`].
    pub fn is_healthy(&self) -> bool {
        matches!(self, CheckStatus::Healthy)
    }
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Unhealthy => write!(f, "unhealthy"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Result of a single check execution.
///
/// Optional fields are omitted from the JSON body: `details` only appears on
/// healthy results, `error` only on failed ones, and fault results carry
/// neither duration nor attempt count.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    /// Check name.
    pub name: String,
    /// Outcome classification.
    pub status: CheckStatus,
    /// Elapsed time of the attempt that settled the outcome.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// RFC 3339 UTC timestamp of when the result was produced.
    pub timestamp: String,
    /// Structured details from the check (healthy results only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Last error message (unhealthy and fault results).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// 1-based count of attempts actually made.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
}

impl CheckResult {
    /// Create a healthy result. `None` details from the check are normalized
    /// to an empty object before this is called.
    pub fn healthy(
        name: impl Into<String>,
        details: serde_json::Value,
        duration_ms: u64,
        attempts: u32,
    ) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Healthy,
            duration_ms: Some(duration_ms),
            timestamp: now_rfc3339(),
            details: Some(details),
            error: None,
            attempts: Some(attempts),
        }
    }

    /// Create an unhealthy result carrying the last attempt's error.
    pub fn unhealthy(
        name: impl Into<String>,
        error: impl Into<String>,
        duration_ms: u64,
        attempts: u32,
    ) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Unhealthy,
            duration_ms: Some(duration_ms),
            timestamp: now_rfc3339(),
            details: None,
            error: Some(error.into()),
            attempts: Some(attempts),
        }
    }

    /// Create a fault result for an execution the engine could not complete.
    pub fn fault(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Error,
            duration_ms: None,
            timestamp: now_rfc3339(),
            details: None,
            error: Some(error.into()),
            attempts: None,
        }
    }

    /// Returns true if the check succeeded.
    pub fn is_healthy(&self) -> bool {
        self.status.is_healthy()
    }

    /// Public view with details and error text stripped.
    pub fn redacted(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "status": self.status,
            "timestamp": self.timestamp,
        })
    }
}

/// Per-status tallies for one sweep.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CheckCounts {
    pub total: u32,
    pub healthy: u32,
    pub unhealthy: u32,
    pub errors: u32,
}

/// Aggregate report for a full sweep.
///
/// `status` is binary: healthy only when nothing is unhealthy and nothing
/// faulted. Results keep registration order.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateReport {
    pub status: CheckStatus,
    pub timestamp: String,
    pub duration_ms: u64,
    pub counts: CheckCounts,
    pub results: Vec<CheckResult>,
}

impl AggregateReport {
    /// Aggregate sweep results into a report.
    pub fn from_results(results: Vec<CheckResult>, duration_ms: u64) -> Self {
        let mut counts = CheckCounts {
            total: results.len() as u32,
            healthy: 0,
            unhealthy: 0,
            errors: 0,
        };
        for result in &results {
            match result.status {
                CheckStatus::Healthy => counts.healthy += 1,
                CheckStatus::Unhealthy => counts.unhealthy += 1,
                CheckStatus::Error => counts.errors += 1,
            }
        }

        let status = if counts.unhealthy == 0 && counts.errors == 0 {
            CheckStatus::Healthy
        } else {
            CheckStatus::Unhealthy
        };

        Self {
            status,
            timestamp: now_rfc3339(),
            duration_ms,
            counts,
            results,
        }
    }

    /// Returns true when every check passed.
    pub fn is_healthy(&self) -> bool {
        self.status.is_healthy()
    }

    /// JSON body for the HTTP surface. Without `include_details`, each result
    /// is redacted to name, status and timestamp.
    pub fn to_json(&self, include_details: bool) -> serde_json::Value {
        let results: Vec<serde_json::Value> = self
            .results
            .iter()
            .map(|r| {
                if include_details {
                    serde_json::json!(r)
                } else {
                    r.redacted()
                }
            })
            .collect();

        serde_json::json!({
            "status": self.status,
            "timestamp": self.timestamp,
            "duration_ms": self.duration_ms,
            "counts": self.counts,
            "results": results,
        })
    }
}

/// Current UTC time in the report timestamp format (RFC 3339, millisecond
/// precision).
pub fn now_rfc3339() -> String {
    chrono::Utc::now()
        .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
