//! Command-line interface for the plugin.
//!
//! mackerel-agent runs the binary once per interval and reads stdout, so
//! everything except metric lines goes to stderr.

use crate::application::Application;
use crate::core::config::ConfigBuilder;
use crate::core::{Config, PluginError, Result};
use crate::reporter::output::PLUGIN_META_ENV;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// mackerel-agent plugin for chocon HTTP statistics
#[derive(Parser, Debug)]
#[command(name = "mackerel-plugin-chocon")]
#[command(about, long_about = None)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Hostname of the chocon instance [default: 127.0.0.1]
    #[arg(long, env = "CHOCON_HOST")]
    pub host: Option<String>,

    /// Port of the chocon instance [default: 80]
    #[arg(long, env = "CHOCON_PORT")]
    pub port: Option<u16>,

    /// Metric name prefix [default: chocon]
    #[arg(long, env = "CHOCON_PREFIX")]
    pub prefix: Option<String>,

    /// Snapshot file kept between runs [default: /tmp/mackerel-plugin-chocon.json]
    #[arg(long, env = "CHOCON_TEMPFILE")]
    pub tempfile: Option<PathBuf>,

    /// Request timeout, e.g. `5s` or `1500ms`
    #[arg(long, env = "CHOCON_TIMEOUT", value_parser = humantime::parse_duration)]
    pub timeout: Option<Duration>,

    /// Configuration file path (default: ~/.config/mackerel-plugin-chocon/config.yaml)
    #[arg(short, long, env = "CHOCON_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, env = "CHOCON_DEBUG")]
    pub debug: bool,

    /// Validate configuration and exit
    #[arg(long)]
    pub check_config: bool,

    /// Print version
    #[arg(short = 'V', long = "version")]
    pub version: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Load configuration with proper precedence:
    /// 1. CLI arguments and environment variables (highest priority)
    /// 2. Config file
    /// 3. Defaults (lowest priority)
    pub async fn load_config(&self) -> Result<Config> {
        let mut builder = ConfigBuilder::new();

        let config_path = if let Some(path) = &self.config {
            path.clone()
        } else {
            let default_path = dirs::config_dir()
                .map(|d| d.join("mackerel-plugin-chocon").join("config.yaml"))
                .unwrap_or_else(|| PathBuf::from("~/.config/mackerel-plugin-chocon/config.yaml"));

            if default_path.exists() {
                default_path
            } else {
                return self.build_config_from_args(builder);
            }
        };

        match tokio::fs::read_to_string(&config_path).await {
            Ok(content) => {
                builder = builder.from_yaml(&content)?;
                tracing::debug!("Loaded configuration from: {:?}", config_path);
            },
            Err(e) if self.config.is_some() => {
                return Err(PluginError::config(format!(
                    "Failed to read config file {:?}: {}",
                    config_path, e
                )));
            },
            Err(_) => {
                tracing::debug!("No config file found at {:?}, using defaults", config_path);
            },
        }

        self.build_config_from_args(builder)
    }

    fn build_config_from_args(&self, mut builder: ConfigBuilder) -> Result<Config> {
        if let Some(host) = &self.host {
            builder = builder.host(host.as_str());
        }
        if let Some(port) = self.port {
            builder = builder.port(port);
        }
        if let Some(prefix) = &self.prefix {
            builder = builder.prefix(prefix.as_str());
        }
        if let Some(tempfile) = &self.tempfile {
            builder = builder.tempfile(tempfile.clone());
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder.build()
    }

    /// Initialize logging. Output goes to stderr; stdout is reserved for the agent.
    pub fn init_logging(&self) -> Result<()> {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

        let env_log_level =
            std::env::var("CHOCON_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());
        let log_level = if self.debug {
            "debug"
        } else {
            env_log_level.as_str()
        };

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(self.debug)
            .compact();

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| PluginError::config(format!("Failed to initialize logging: {}", e)))?;

        Ok(())
    }
}

/// Check whether the agent asked for graph definitions
pub fn plugin_meta_requested() -> bool {
    meta_flag(std::env::var(PLUGIN_META_ENV).ok().as_deref())
}

fn meta_flag(value: Option<&str>) -> bool {
    value == Some("1")
}

/// Execute one plugin invocation.
pub async fn execute(cli: Cli) -> Result<()> {
    // Handle version flag first
    if cli.version {
        println!("version: {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    cli.init_logging()?;

    let config = cli.load_config().await.map_err(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        e
    })?;

    if cli.check_config {
        println!("Configuration is valid!");
        println!("  Stats URL: {}", config.target.url());
        println!("  Prefix: {}", config.plugin.prefix);
        println!("  Tempfile: {}", config.plugin.tempfile.display());
        println!("  Percentiles: {:?}", config.catalog.percentiles);
        return Ok(());
    }

    let app = Application::new(config)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if plugin_meta_requested() {
        return app.describe(&mut out);
    }

    match app.run(&mut out).await {
        Ok(values) => {
            tracing::debug!(reported = values.len(), "Metrics reported");
            Ok(())
        },
        Err(e) => {
            tracing::error!(error = %e, category = e.category(), "Collection failed");
            Err(e)
        },
    }
}
