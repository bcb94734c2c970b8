//! Configuration module for healthgate.
//!
//! This module provides centralized configuration loading from environment variables.
//!
//! # Example
//!
//! ```rust,ignore
//! use healthgate::config::Config;
//!
//! let config = Config::from_env()?;
//! println!("Listen address: {}", config.server.listen_addr);
//! println!("Environment: {}", config.monitor.environment);
//! ```

mod error;
mod logging;
mod monitor;
mod parse;
mod probes;
mod server;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use monitor::MonitorConfig;
pub use probes::ProbesConfig;
pub use server::ServerConfig;

/// Complete application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Health monitor configuration.
    pub monitor: MonitorConfig,
    /// Probe configuration.
    pub probes: ProbesConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            server: ServerConfig::from_env()?,
            monitor: MonitorConfig::from_env()?,
            probes: ProbesConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        })
    }

    /// Print configuration summary to log.
    pub fn log_summary(&self) {
        use tracing::info;

        info!("Configuration loaded:");
        info!("  Listen: {}", self.server.listen_addr);
        info!("  Environment: {}", self.monitor.environment);

        match self.monitor.interval {
            Some(interval) => info!("  Health interval: {}s", interval.as_secs()),
            None => info!("  Health interval: disabled"),
        }

        if !self.monitor.startup_check {
            info!("  Startup check: disabled");
        }

        info!("  TCP probes: {}", self.probes.tcp.len());
        info!("  HTTP probes: {}", self.probes.http.len());

        if self.probes.system {
            info!(
                "  System probe: enabled (memory limit {:.0}%)",
                self.probes.memory_limit_percent
            );
        } else {
            info!("  System probe: disabled");
        }
    }
}
