//! Server configuration.
//!
//! Configuration can be loaded from:
//! - Environment variables (RELAY_*)
//! - TOML configuration file
//!
//! The listening port always comes from the command line and overrides
//! whatever the file or environment say.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Resource limits.
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Chat log configuration.
    #[serde(default)]
    pub log: LogConfig,

    /// Metrics configuration.
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Resource limits configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Maximum number of concurrently registered participants.
    /// Connections past this are refused.
    #[serde(default = "default_max_participants")]
    pub max_participants: usize,

    /// Read buffer size in bytes; one read of up to this many bytes is
    /// one logical message.
    #[serde(default = "default_read_buffer_size")]
    pub read_buffer_size: usize,

    /// Per-participant outbox depth. A peer that stops draining its
    /// socket starts losing messages once its outbox fills.
    #[serde(default = "default_outbox_capacity")]
    pub outbox_capacity: usize,
}

/// Chat log configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Append-only chat log path.
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable the Prometheus exporter.
    #[serde(default)]
    pub enabled: bool,

    /// Metrics port.
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

// Default value functions
fn default_host() -> String {
    std::env::var("RELAY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string())
}

fn default_port() -> u16 {
    std::env::var("RELAY_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(9090)
}

fn default_max_participants() -> usize {
    100
}

fn default_read_buffer_size() -> usize {
    1024
}

fn default_outbox_capacity() -> usize {
    64
}

fn default_log_file() -> PathBuf {
    PathBuf::from("log.txt")
}

fn default_metrics_port() -> u16 {
    9091
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            limits: LimitsConfig::default(),
            log: LogConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_participants: default_max_participants(),
            read_buffer_size: default_read_buffer_size(),
            outbox_capacity: default_outbox_capacity(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_metrics_port(),
        }
    }
}

impl Config {
    /// Load configuration from the default file locations, falling back
    /// to defaults with environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_paths = [
            "relay.toml",
            "/etc/relay/relay.toml",
            "~/.config/relay/relay.toml",
        ];

        for path in &config_paths {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                return Self::from_file(expanded.as_ref());
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// The socket address to bind to.
    ///
    /// # Errors
    ///
    /// Returns an error if host and port do not form a valid address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid bind address {}:{}", self.host, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.limits.max_participants, 100);
        assert_eq!(config.limits.read_buffer_size, 1024);
        assert_eq!(config.log.file, PathBuf::from("log.txt"));
        assert!(!config.metrics.enabled);
    }

    #[test]
    fn test_config_bind_addr() {
        let config = Config {
            host: "127.0.0.1".into(),
            port: 4000,
            ..Config::default()
        };
        let addr = config.bind_addr().unwrap();
        assert_eq!(addr.port(), 4000);
    }

    #[test]
    fn test_config_bind_addr_invalid_host() {
        let config = Config {
            host: "not a host".into(),
            ..Config::default()
        };
        assert!(config.bind_addr().is_err());
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
            host = "127.0.0.1"
            port = 9000

            [limits]
            max_participants = 8

            [log]
            file = "/var/log/relay/chat.log"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9000);
        assert_eq!(config.limits.max_participants, 8);
        assert_eq!(config.log.file, PathBuf::from("/var/log/relay/chat.log"));
        // Unspecified sections keep their defaults.
        assert_eq!(config.limits.read_buffer_size, 1024);
    }
}
