//! Error types for the plugin.
//!
//! Every failure of an invocation maps to one [`PluginError`] variant. Only
//! [`PluginError::SnapshotLoad`] is recovered from; the rest abort the run.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while collecting and reporting chocon statistics
#[derive(Error, Debug)]
pub enum PluginError {
    /// The stats request could not be completed
    #[error("Transport error fetching {url}: {source}")]
    Transport {
        /// Requested stats URL
        url: String,
        /// Underlying HTTP client error
        #[source]
        source: reqwest::Error,
    },

    /// The stats endpoint answered with a non-success status
    #[error("Stats endpoint {url} answered with HTTP {status}")]
    HttpStatus {
        /// Requested stats URL
        url: String,
        /// HTTP status code received
        status: u16,
    },

    /// The stats body was not the expected JSON document
    #[error("Failed to decode stats response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The prior snapshot exists but could not be read or parsed
    #[error("Failed to load snapshot {path:?}: {message}")]
    SnapshotLoad {
        /// Snapshot file location
        path: PathBuf,
        /// What went wrong
        message: String,
    },

    /// The current snapshot could not be written
    #[error("Failed to persist snapshot {path:?}: {source}")]
    SnapshotPersist {
        /// Snapshot file location
        path: PathBuf,
        /// Underlying write or encode failure
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Writing metric lines or graph definitions to stdout failed
    #[error("Failed to write plugin output: {0}")]
    Output(#[source] std::io::Error),
}

/// Result type alias for plugin operations
pub type Result<T> = std::result::Result<T, PluginError>;

impl PluginError {
    /// Creates a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a new snapshot load error
    pub fn snapshot_load<P: Into<PathBuf>, S: Into<String>>(path: P, msg: S) -> Self {
        Self::SnapshotLoad {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Creates a new snapshot persist error
    pub fn snapshot_persist<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::SnapshotPersist {
            path: path.into(),
            source,
        }
    }

    /// Returns true if the invocation must abort on this error.
    ///
    /// Only a failed snapshot load is recovered from: the run degrades to a
    /// cold start instead.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::SnapshotLoad { .. })
    }

    /// Returns the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Transport { .. } | Self::HttpStatus { .. } => "transport",
            Self::Decode(_) => "decode",
            Self::SnapshotLoad { .. } => "snapshot_load",
            Self::SnapshotPersist { .. } => "snapshot_persist",
            Self::Config(_) => "config",
            Self::Output(_) => "output",
        }
    }
}
