//! Delta computation and reporting.
//!
//! Each invocation runs load → compute → persist → emit, in that order.
//! Persisting before emitting means a failed write produces no output at all,
//! so the agent never receives values derived from a snapshot that the next
//! run will not see.

pub mod output;
pub mod snapshot;

use crate::core::{MetricKind, MetricSnapshot, PluginError, Result, SnapshotEntry};
use crate::metrics::Catalog;
use std::io::Write;
use tracing::{debug, warn};

pub use snapshot::{FileSnapshotStore, SnapshotStore};

/// Per-second rate of a counter between two observations.
///
/// A current value below the prior one means the upstream counter restarted;
/// the rate is then computed from zero. Returns `None` when no time has
/// elapsed or the timestamps are too far apart to subtract.
#[allow(clippy::cast_precision_loss)]
pub fn counter_rate(prior: &SnapshotEntry, current: &SnapshotEntry) -> Option<f64> {
    let Some(elapsed) = current
        .timestamp
        .checked_sub(prior.timestamp)
        .filter(|e| *e > 0)
    else {
        return None;
    };

    let delta = if current.value < prior.value {
        current.value
    } else {
        current.value - prior.value
    };
    Some(delta / elapsed as f64)
}

/// Turns raw snapshots into reported values
pub struct Reporter<'a, S> {
    catalog: &'a Catalog,
    prefix: String,
    store: S,
}

impl<'a, S: SnapshotStore> Reporter<'a, S> {
    /// Create a reporter for `catalog`, naming metrics under `prefix`
    pub fn new(catalog: &'a Catalog, prefix: impl Into<String>, store: S) -> Self {
        Self {
            catalog,
            prefix: prefix.into(),
            store,
        }
    }

    /// Compute reported values from the current and prior snapshots.
    ///
    /// Output names are `{prefix}.{graph}.{metric}`. Only metrics present in
    /// the catalog are reported.
    pub fn compute(&self, current: &MetricSnapshot, prior: Option<&MetricSnapshot>) -> MetricSnapshot {
        let mut values = MetricSnapshot::new();

        for (graph, metric) in self.catalog.definitions() {
            let Some(now) = current.get(&metric.name) else {
                debug!(metric = %metric.name, "No current value");
                continue;
            };

            let value = match metric.kind {
                MetricKind::Gauge => Some(now.value),
                MetricKind::Counter => prior
                    .and_then(|p| p.get(&metric.name))
                    .and_then(|before| counter_rate(before, now)),
            };

            match value {
                Some(value) => values.insert(
                    format!("{}.{}.{}", self.prefix, graph.key, metric.name),
                    value,
                    now.timestamp,
                ),
                None => debug!(metric = %metric.name, "Counter has no usable prior value, skipped"),
            }
        }

        values
    }

    /// Load the prior snapshot, degrading to a cold start on any failure
    pub fn load_prior(&self) -> Option<MetricSnapshot> {
        match self.store.load() {
            Ok(prior) => prior,
            Err(e) => {
                warn!(error = %e, category = e.category(), "Ignoring unreadable snapshot");
                None
            }
        }
    }

    /// Run one reporting cycle and write the result to `out`.
    ///
    /// Returns the values that were emitted.
    pub fn report<W: Write>(&self, current: &MetricSnapshot, out: &mut W) -> Result<MetricSnapshot> {
        let prior = self.load_prior();
        if prior.is_none() {
            debug!("No prior snapshot, counters are skipped this run");
        }

        let values = self.compute(current, prior.as_ref());
        self.store.persist(current)?;
        output::write_values(out, &values).map_err(PluginError::Output)?;

        debug!(reported = values.len(), "Report complete");
        Ok(values)
    }
}
