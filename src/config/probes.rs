//! Probe configuration.
//!
//! Probe targets come from comma-separated `name=target` lists, e.g.:
//!
//! ```text
//! TCP_PROBES=postgres=127.0.0.1:5432,redis=127.0.0.1:6379
//! HTTP_PROBES=auth=http://auth:8080/status,billing=http://billing:8081/status
//! ```

use std::time::Duration;

use http::Uri;

use super::parse::{env_bool, env_duration, env_opt, env_parse, parse_named_list};
use super::ConfigError;

/// Probe configuration loaded from environment.
#[derive(Clone, Debug)]
pub struct ProbesConfig {
    /// TCP probe targets as (name, host:port) pairs.
    pub tcp: Vec<(String, String)>,
    /// Per-attempt timeout for TCP probes (default: 5s).
    pub tcp_timeout: Duration,
    /// Total attempts per TCP probe execution (default: 2).
    pub tcp_retries: u32,
    /// HTTP probe targets as (name, url) pairs.
    pub http: Vec<(String, Uri)>,
    /// Per-attempt timeout for HTTP probes (default: 10s).
    pub http_timeout: Duration,
    /// Total attempts per HTTP probe execution (default: 1).
    pub http_retries: u32,
    /// Register the local system resources check (default: true).
    pub system: bool,
    /// Memory usage limit for the system check, in percent (default: 90).
    pub memory_limit_percent: f64,
}

impl Default for ProbesConfig {
    fn default() -> Self {
        Self {
            tcp: Vec::new(),
            tcp_timeout: Duration::from_secs(5),
            tcp_retries: 2,
            http: Vec::new(),
            http_timeout: Duration::from_secs(10),
            http_retries: 1,
            system: true,
            memory_limit_percent: 90.0,
        }
    }
}

impl ProbesConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let tcp = match env_opt("TCP_PROBES") {
            Some(list) => parse_named_list(&list).map_err(|e| ConfigError::Parse {
                key: "TCP_PROBES".into(),
                value: list,
                error: e,
            })?,
            None => Vec::new(),
        };

        let http = match env_opt("HTTP_PROBES") {
            Some(list) => parse_http_targets(&list)?,
            None => Vec::new(),
        };

        Ok(Self {
            tcp,
            tcp_timeout: env_duration("TCP_PROBE_TIMEOUT", "5s")?.unwrap_or(defaults.tcp_timeout),
            tcp_retries: env_parse("TCP_PROBE_RETRIES", defaults.tcp_retries)?,
            http,
            http_timeout: env_duration("HTTP_PROBE_TIMEOUT", "10s")?
                .unwrap_or(defaults.http_timeout),
            http_retries: env_parse("HTTP_PROBE_RETRIES", defaults.http_retries)?,
            system: env_bool("SYSTEM_PROBE", defaults.system),
            memory_limit_percent: env_parse("MEMORY_LIMIT_PERCENT", defaults.memory_limit_percent)?,
        })
    }
}

/// Parse the HTTP_PROBES list into named `Uri` targets.
///
/// The probe client speaks plain http, so only absolute `http://` urls are
/// accepted; anything else fails configuration instead of producing a check
/// that can never connect.
fn parse_http_targets(list: &str) -> Result<Vec<(String, Uri)>, ConfigError> {
    let pairs = parse_named_list(list).map_err(|e| ConfigError::Parse {
        key: "HTTP_PROBES".into(),
        value: list.to_string(),
        error: e,
    })?;

    let mut targets = Vec::with_capacity(pairs.len());
    for (name, target) in pairs {
        let url: Uri = target.parse().map_err(|e| ConfigError::Parse {
            key: "HTTP_PROBES".into(),
            value: target.clone(),
            error: format!("{}", e),
        })?;
        if url.scheme_str() != Some("http") || url.authority().is_none() {
            return Err(ConfigError::Invalid {
                key: "HTTP_PROBES".into(),
                message: format!("'{}' is not an absolute http url", target),
            });
        }
        targets.push((name, url));
    }

    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_http_targets() {
        let targets =
            parse_http_targets("auth=http://auth:8080/status,billing=http://billing:8081/")
                .unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].0, "auth");
        assert_eq!(targets[0].1.to_string(), "http://auth:8080/status");

        assert!(parse_http_targets("rel=/status").is_err());
        assert!(parse_http_targets("bad=not a url").is_err());
    }

    #[test]
    fn test_https_target_rejected() {
        // The probe client is http-only; an https target would pass config
        // and then fail every attempt with a connector error.
        let err = parse_http_targets("vault=https://vault:8200/health").unwrap_err();
        assert!(err
            .to_string()
            .contains("'https://vault:8200/health' is not an absolute http url"));
    }
}
