//! Server configuration.
//!
//! Loaded from an optional YAML file (path in `SNOOZE_CONFIG`), with the
//! `LISTEN` environment variable taking precedence for the bind address.

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the path of the YAML config file.
pub const CONFIG_ENV: &str = "SNOOZE_CONFIG";

/// Environment variable overriding `server.listen_addr`.
pub const LISTEN_ENV: &str = "LISTEN";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// Listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. "127.0.0.1:8000")
    pub listen_addr: String,
    /// How many times binding is attempted before giving up
    pub bind_attempts: u32,
    /// Delay before the second bind attempt; doubled on every further attempt
    pub bind_retry_delay_ms: u64,
    /// Upper bound for the backoff delay
    pub bind_retry_max_delay_ms: u64,
    /// Request line size limit
    pub max_request_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8000".to_string(),
            bind_attempts: 5,
            bind_retry_delay_ms: 2000,
            bind_retry_max_delay_ms: 16_000,
            max_request_bytes: 8192,
        }
    }
}

impl ServerConfig {
    /// Backoff to wait after the given failed attempt (1-based).
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        let factor = 1u64
            .checked_shl(attempt.saturating_sub(1))
            .unwrap_or(u64::MAX);
        let delay = self.bind_retry_delay_ms.saturating_mul(factor);
        Duration::from_millis(delay.min(self.bind_retry_max_delay_ms))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };

        if let Ok(listen_addr) = std::env::var(LISTEN_ENV) {
            config.server.listen_addr = listen_addr;
        }

        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_yaml(&contents)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))
    }

    pub fn from_yaml(contents: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }
}
