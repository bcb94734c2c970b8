//! Health monitor configuration.

use std::time::Duration;

use super::parse::{env_bool, env_duration, env_or};
use super::ConfigError;

/// Health monitor configuration loaded from environment.
#[derive(Clone, Debug)]
pub struct MonitorConfig {
    /// Periodic sweep interval (default: 30s). None disables the background monitor.
    pub interval: Option<Duration>,
    /// Run the startup verification sweep before serving (default: true).
    pub startup_check: bool,
    /// Deployment environment name (default: development).
    pub environment: String,
}

impl MonitorConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            interval: env_duration("HEALTH_INTERVAL", "30s")?,
            startup_check: env_bool("STARTUP_CHECK", true),
            environment: env_or("ENVIRONMENT", "development"),
        })
    }

    /// Whether this deployment runs in production mode.
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
