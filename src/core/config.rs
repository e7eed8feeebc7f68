//! Configuration management for the plugin.
//!
//! Values are layered, highest priority first:
//! - CLI arguments
//! - Environment variables
//! - YAML config file
//! - Defaults

use crate::core::{PluginError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Path of the chocon stats API.
pub const DEFAULT_STATS_PATH: &str = "/.api/http-stats";

/// Complete plugin configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Stats endpoint configuration
    pub target: TargetConfig,
    /// Reporting configuration
    pub plugin: PluginConfig,
    /// Metric catalog configuration
    pub catalog: CatalogConfig,
}

/// Where the stats endpoint lives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Host running chocon
    pub host: String,
    /// Port chocon listens on
    pub port: u16,
    /// Stats API path
    pub path: String,
    /// Request timeout; the HTTP client default applies when unset
    #[serde(with = "humantime_serde")]
    pub timeout: Option<Duration>,
}

/// Metric naming and snapshot persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Metric key prefix
    pub prefix: String,
    /// Snapshot file carried between invocations
    pub tempfile: PathBuf,
}

/// Percentiles and status classes that shape the metric catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Reported response time percentiles
    pub percentiles: Vec<u32>,
    /// Status codes summed into `count_4xx`
    pub status_4xx: Vec<u16>,
    /// Status codes summed into `count_5xx`
    pub status_5xx: Vec<u16>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        TargetConfig {
            host: "127.0.0.1".to_string(),
            port: 80,
            path: DEFAULT_STATS_PATH.to_string(),
            timeout: None,
        }
    }
}

impl Default for PluginConfig {
    fn default() -> Self {
        PluginConfig {
            prefix: "chocon".to_string(),
            tempfile: PathBuf::from("/tmp/mackerel-plugin-chocon.json"),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            percentiles: vec![90, 95, 99],
            // 403 has its own metric and is left out of the class sum
            status_4xx: vec![404, 401, 405],
            status_5xx: vec![500, 502, 503, 504],
        }
    }
}

impl TargetConfig {
    /// `host:port` of the stats endpoint
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Full URL of the stats API
    pub fn url(&self) -> String {
        format!("http://{}{}", self.address(), self.path)
    }
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.target.host.trim().is_empty() {
            return Err(PluginError::config("host must not be empty"));
        }

        if self.target.port == 0 {
            return Err(PluginError::config("port must be greater than 0"));
        }

        if !self.target.path.starts_with('/') {
            return Err(PluginError::config(format!(
                "stats path must start with '/', got '{}'",
                self.target.path
            )));
        }

        if self.target.timeout == Some(Duration::ZERO) {
            return Err(PluginError::config("timeout must be greater than 0"));
        }

        if self.plugin.prefix.trim().is_empty() {
            return Err(PluginError::config("prefix must not be empty"));
        }

        if self.plugin.tempfile.as_os_str().is_empty() {
            return Err(PluginError::config("tempfile must not be empty"));
        }

        if self.catalog.percentiles.is_empty() {
            return Err(PluginError::config("at least one percentile is required"));
        }

        if let Some(p) = self.catalog.percentiles.iter().find(|p| !(1..=100).contains(*p)) {
            return Err(PluginError::config(format!(
                "percentile must be between 1 and 100, got {}",
                p
            )));
        }

        check_status_class("status_4xx", &self.catalog.status_4xx, 400)?;
        check_status_class("status_5xx", &self.catalog.status_5xx, 500)?;

        Ok(())
    }
}

fn check_status_class(name: &str, codes: &[u16], base: u16) -> Result<()> {
    match codes.iter().find(|code| !(base..base + 100).contains(*code)) {
        Some(code) => Err(PluginError::config(format!(
            "{} contains {} which is outside {}-{}",
            name,
            code,
            base,
            base + 99
        ))),
        None => Ok(()),
    }
}

/// Configuration builder for programmatic construction
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with defaults
    pub fn new() -> Self {
        ConfigBuilder {
            config: Config::default(),
        }
    }

    /// Load configuration from YAML string
    pub fn from_yaml(mut self, yaml: &str) -> Result<Self> {
        self.config = serde_yaml::from_str(yaml)
            .map_err(|e| PluginError::config(format!("Failed to parse YAML config: {}", e)))?;
        Ok(self)
    }

    /// Set stats host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.target.host = host.into();
        self
    }

    /// Set stats port
    pub fn port(mut self, port: u16) -> Self {
        self.config.target.port = port;
        self
    }

    /// Set request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.target.timeout = Some(timeout);
        self
    }

    /// Set metric key prefix
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.plugin.prefix = prefix.into();
        self
    }

    /// Set snapshot file path
    pub fn tempfile(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.plugin.tempfile = path.into();
        self
    }

    /// Set reported percentiles
    pub fn percentiles(mut self, percentiles: Vec<u32>) -> Self {
        self.config.catalog.percentiles = percentiles;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}
