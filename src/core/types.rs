//! Domain types shared by the collector and the reporter.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a metric is turned into a reported value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// Monotonically increasing raw value, reported as a per-second rate
    Counter,
    /// Point-in-time value, reported as-is
    Gauge,
}

/// Display unit understood by the monitoring agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricUnit {
    /// Whole numbers (request counts)
    Integer,
    /// Fractional numbers (response times)
    Float,
}

/// A single metric in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDefinition {
    /// Unique key within its graph, e.g. `count_4xx`
    pub name: String,
    /// Human readable label
    pub label: String,
    /// Counter or gauge
    pub kind: MetricKind,
    /// Value unit
    pub unit: MetricUnit,
}

impl MetricDefinition {
    /// Create a counter definition
    pub fn counter(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind: MetricKind::Counter,
            unit: MetricUnit::Integer,
        }
    }

    /// Create a gauge definition
    pub fn gauge(name: impl Into<String>, label: impl Into<String>, unit: MetricUnit) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind: MetricKind::Gauge,
            unit,
        }
    }
}

/// Metrics drawn together on one graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphDefinition {
    /// Graph key, e.g. `http.requests`
    pub key: String,
    /// Display label
    pub label: String,
    /// Unit shared by every metric in the graph
    pub unit: MetricUnit,
    /// Member metrics
    pub metrics: Vec<MetricDefinition>,
}

/// One observed value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    /// Raw value as reported upstream
    pub value: f64,
    /// Observation time, unix seconds
    pub timestamp: i64,
}

/// Raw metric values observed at one instant, keyed by metric name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricSnapshot {
    entries: BTreeMap<String, SnapshotEntry>,
}

impl MetricSnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value
    pub fn insert(&mut self, name: impl Into<String>, value: f64, timestamp: i64) {
        self.entries
            .insert(name.into(), SnapshotEntry { value, timestamp });
    }

    /// Look up a value by metric name
    pub fn get(&self, name: &str) -> Option<&SnapshotEntry> {
        self.entries.get(name)
    }

    /// Number of recorded metrics
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SnapshotEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}
