//! Configuration, errors and domain types shared across the plugin.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{Config, ConfigBuilder};
pub use error::{PluginError, Result};
pub use types::{
    GraphDefinition, MetricDefinition, MetricKind, MetricSnapshot, MetricUnit, SnapshotEntry,
};
