//! Global configuration parsing and validation.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::{AppError, Result};

fn default_http_port() -> u16 {
    3000
}

fn default_heartbeat_interval_seconds() -> u64 {
    30
}

fn default_capture_timeout_seconds() -> u64 {
    15
}

/// Global configuration parsed from `config.toml`.
///
/// Every field has a default, so a missing config file (or an empty one)
/// yields a fully working coordinator.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// HTTP/WebSocket listen port.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Interval between liveness probes against registered sessions.
    #[serde(default = "default_heartbeat_interval_seconds")]
    pub heartbeat_interval_seconds: u64,
    /// How long a capture request waits for the provider before timing out.
    #[serde(default = "default_capture_timeout_seconds")]
    pub capture_timeout_seconds: u64,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            heartbeat_interval_seconds: default_heartbeat_interval_seconds(),
            capture_timeout_seconds: default_capture_timeout_seconds(),
        }
    }
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Liveness probe interval as a [`Duration`].
    #[must_use]
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_seconds)
    }

    /// Capture timeout window as a [`Duration`].
    #[must_use]
    pub fn capture_timeout(&self) -> Duration {
        Duration::from_secs(self.capture_timeout_seconds)
    }

    fn validate(&self) -> Result<()> {
        if self.heartbeat_interval_seconds == 0 {
            return Err(AppError::Config(
                "heartbeat_interval_seconds must be greater than zero".into(),
            ));
        }

        if self.capture_timeout_seconds == 0 {
            return Err(AppError::Config(
                "capture_timeout_seconds must be greater than zero".into(),
            ));
        }

        Ok(())
    }
}
