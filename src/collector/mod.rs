//! Stats collection from a chocon instance.
//!
//! One GET against the stats API, decoded and flattened into a
//! [`MetricSnapshot`]. Failures are not retried.

pub mod stats;

use crate::core::config::TargetConfig;
use crate::core::{MetricSnapshot, PluginError, Result};
use crate::metrics::catalog::{self, Catalog};
use chrono::Utc;
use tracing::debug;

pub use stats::{HttpStats, RequestStats, ResponseStats};

/// HTTP client for the stats endpoint
#[derive(Debug, Clone)]
pub struct Collector {
    client: reqwest::Client,
    url: String,
}

impl Collector {
    /// Create a collector for the configured target
    pub fn new(target: &TargetConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = target.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| PluginError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: target.url(),
        })
    }

    /// URL polled by this collector
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the raw stats document
    pub async fn fetch_stats(&self) -> Result<HttpStats> {
        debug!(url = %self.url, "Fetching stats");

        let response = self.client.get(&self.url).send().await.map_err(|e| {
            PluginError::Transport {
                url: self.url.clone(),
                source: e,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PluginError::HttpStatus {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| PluginError::Transport {
            url: self.url.clone(),
            source: e,
        })?;

        serde_json::from_slice(&body).map_err(PluginError::Decode)
    }

    /// Fetch stats and flatten them, stamped with the current time
    pub async fn fetch(&self, catalog: &Catalog) -> Result<MetricSnapshot> {
        let stats = self.fetch_stats().await?;
        let snapshot = snapshot_from_stats(&stats, catalog, Utc::now().timestamp());
        debug!(metrics = snapshot.len(), "Collected snapshot");
        Ok(snapshot)
    }
}

/// Flatten a stats document into the catalog's metric names.
#[allow(clippy::cast_precision_loss)]
pub fn snapshot_from_stats(stats: &HttpStats, catalog: &Catalog, timestamp: i64) -> MetricSnapshot {
    let request = &stats.request;
    let response = &stats.response;
    let mut snapshot = MetricSnapshot::new();

    snapshot.insert(catalog::COUNT, request.count as f64, timestamp);
    snapshot.insert(catalog::AVG_TIME, response.average_time, timestamp);
    snapshot.insert(catalog::COUNT_200, request.status(200) as f64, timestamp);
    snapshot.insert(catalog::COUNT_403, request.status(403) as f64, timestamp);
    snapshot.insert(
        catalog::COUNT_4XX,
        request.sum_statuses(catalog.status_4xx()) as f64,
        timestamp,
    );
    snapshot.insert(
        catalog::COUNT_5XX,
        request.sum_statuses(catalog.status_5xx()) as f64,
        timestamp,
    );

    for p in catalog.percentiles() {
        snapshot.insert(
            catalog::percentile_metric(*p),
            response.percentile(*p),
            timestamp,
        );
    }

    snapshot
}
