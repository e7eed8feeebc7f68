//! One plugin invocation, from fetch to output.

use crate::collector::Collector;
use crate::core::{Config, MetricSnapshot, Result};
use crate::metrics::Catalog;
use crate::reporter::{output, FileSnapshotStore, Reporter};
use std::io::Write;

/// Coordinates the collector and the reporter for a single run.
pub struct Application {
    /// HTTP client for the stats endpoint
    collector: Collector,
    /// Metric catalog built from the configuration
    catalog: Catalog,
    /// Application configuration
    config: Config,
}

impl Application {
    /// Create a new Application with the given configuration.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let collector = Collector::new(&config.target)?;
        let catalog = Catalog::from_config(&config.catalog);

        Ok(Self {
            collector,
            catalog,
            config,
        })
    }

    /// Fetch, compute, persist and emit.
    ///
    /// Nothing is written to `out` and the snapshot file is left untouched
    /// when the fetch fails.
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<MetricSnapshot> {
        tracing::debug!(url = %self.collector.url(), "Starting collection");

        let current = self.collector.fetch(&self.catalog).await?;

        let store = FileSnapshotStore::new(&self.config.plugin.tempfile);
        let reporter = Reporter::new(&self.catalog, self.config.plugin.prefix.as_str(), store);
        reporter.report(&current, out)
    }

    /// Print graph definitions for the agent instead of collecting.
    pub fn describe<W: Write>(&self, out: &mut W) -> Result<()> {
        output::write_graph_definitions(out, &self.catalog, &self.config.plugin.prefix)
            .map_err(crate::core::PluginError::Output)
    }
}
