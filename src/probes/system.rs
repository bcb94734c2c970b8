//! Local system resource probe.

use async_trait::async_trait;
use std::fs;

use super::Probe;
use crate::health::CheckError;

/// Snapshot of load and memory figures.
///
/// Read from /proc on Linux; on other platforms the snapshot stays at its
/// defaults.
#[derive(Debug, Default)]
pub struct SystemSnapshot {
    /// Load average (1 minute)
    pub load_avg_1m: f64,
    /// Load average (5 minutes)
    pub load_avg_5m: f64,
    /// Load average (15 minutes)
    pub load_avg_15m: f64,
    /// Total memory in bytes
    pub memory_total_bytes: u64,
    /// Available memory in bytes
    pub memory_available_bytes: u64,
    /// Used memory in bytes (total - available)
    pub memory_used_bytes: u64,
    /// Memory usage percentage
    pub memory_usage_percent: f64,
}

impl SystemSnapshot {
    /// Read current figures from /proc (Linux) or return defaults.
    pub fn read() -> Self {
        let mut snapshot = Self::default();

        if let Ok(content) = fs::read_to_string("/proc/loadavg") {
            let parts: Vec<&str> = content.split_whitespace().collect();
            if parts.len() >= 3 {
                snapshot.load_avg_1m = parts[0].parse().unwrap_or(0.0);
                snapshot.load_avg_5m = parts[1].parse().unwrap_or(0.0);
                snapshot.load_avg_15m = parts[2].parse().unwrap_or(0.0);
            }
        }

        if let Ok(content) = fs::read_to_string("/proc/meminfo") {
            for line in content.lines() {
                if line.starts_with("MemTotal:") {
                    snapshot.memory_total_bytes = parse_meminfo_kb(line) * 1024;
                } else if line.starts_with("MemAvailable:") {
                    snapshot.memory_available_bytes = parse_meminfo_kb(line) * 1024;
                }
            }
            if snapshot.memory_total_bytes > 0 {
                snapshot.memory_used_bytes = snapshot
                    .memory_total_bytes
                    .saturating_sub(snapshot.memory_available_bytes);
                snapshot.memory_usage_percent = (snapshot.memory_used_bytes as f64
                    / snapshot.memory_total_bytes as f64)
                    * 100.0;
            }
        }

        snapshot
    }
}

/// Parse a line like "MemTotal:       16384000 kB" and return the value in KB
fn parse_meminfo_kb(line: &str) -> u64 {
    line.split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}

/// Probe that fails when memory usage crosses the configured limit.
pub struct SystemProbe {
    memory_limit_percent: f64,
}

impl SystemProbe {
    /// Create a probe with a memory usage limit in percent (0-100).
    pub fn new(memory_limit_percent: f64) -> Self {
        Self {
            memory_limit_percent,
        }
    }
}

#[async_trait]
impl Probe for SystemProbe {
    async fn run(&self) -> Result<Option<serde_json::Value>, CheckError> {
        let snapshot = SystemSnapshot::read();
        if snapshot.memory_usage_percent > self.memory_limit_percent {
            return Err(format!(
                "memory usage {:.1}% above limit {:.1}%",
                snapshot.memory_usage_percent, self.memory_limit_percent
            )
            .into());
        }

        Ok(Some(serde_json::json!({
            "load_avg_1m": snapshot.load_avg_1m,
            "load_avg_5m": snapshot.load_avg_5m,
            "load_avg_15m": snapshot.load_avg_15m,
            "memory_total_bytes": snapshot.memory_total_bytes,
            "memory_used_bytes": snapshot.memory_used_bytes,
            "memory_usage_percent": snapshot.memory_usage_percent,
        })))
    }

    fn kind(&self) -> &'static str {
        "system"
    }

    fn target(&self) -> String {
        "/proc".to_string()
    }
}
