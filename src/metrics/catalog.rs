//! The fixed metric catalog reported by the plugin.
//!
//! Built once at startup from [`CatalogConfig`] and handed to both the
//! collector (which metrics to produce) and the reporter (how to report them).

use crate::core::config::CatalogConfig;
use crate::core::{GraphDefinition, MetricDefinition, MetricUnit};

/// Graph key of the request counters
pub const REQUESTS_GRAPH: &str = "http.requests";
/// Graph key of the latency gauges
pub const LATENCY_GRAPH: &str = "http.latency";

/// Total request count
pub const COUNT: &str = "count";
/// Average response time
pub const AVG_TIME: &str = "avg_time";
/// Requests answered with 200
pub const COUNT_200: &str = "count_200";
/// Requests answered with 403
pub const COUNT_403: &str = "count_403";
/// Requests answered with a status in the 4xx class
pub const COUNT_4XX: &str = "count_4xx";
/// Requests answered with a status in the 5xx class
pub const COUNT_5XX: &str = "count_5xx";

/// Metric name of a response time percentile
pub fn percentile_metric(percentile: u32) -> String {
    format!("time_percentile_{}", percentile)
}

/// Immutable metric catalog plus the classification data behind it.
#[derive(Debug, Clone)]
pub struct Catalog {
    graphs: Vec<GraphDefinition>,
    percentiles: Vec<u32>,
    status_4xx: Vec<u16>,
    status_5xx: Vec<u16>,
}

impl Catalog {
    /// Build the catalog. Duplicate entries in the configured lists are dropped.
    pub fn from_config(config: &CatalogConfig) -> Self {
        let percentiles = dedup(&config.percentiles);
        let status_4xx = dedup(&config.status_4xx);
        let status_5xx = dedup(&config.status_5xx);

        let mut requests = vec![MetricDefinition::counter(COUNT, "http count in a period")];
        for status in ["200", "403", "4xx", "5xx"] {
            requests.push(MetricDefinition::counter(
                format!("count_{}", status),
                format!("http request of status {}", status),
            ));
        }

        let mut latency = vec![MetricDefinition::gauge(
            AVG_TIME,
            "average http response time",
            MetricUnit::Float,
        )];
        latency.extend(percentiles.iter().map(|p| {
            MetricDefinition::gauge(
                percentile_metric(*p),
                format!("{} percentile of http response time", p),
                MetricUnit::Float,
            )
        }));

        let graphs = vec![
            GraphDefinition {
                key: REQUESTS_GRAPH.to_string(),
                label: "http requests".to_string(),
                unit: MetricUnit::Integer,
                metrics: requests,
            },
            GraphDefinition {
                key: LATENCY_GRAPH.to_string(),
                label: "http latency".to_string(),
                unit: MetricUnit::Float,
                metrics: latency,
            },
        ];

        Self {
            graphs,
            percentiles,
            status_4xx,
            status_5xx,
        }
    }

    /// All graphs, in presentation order
    pub fn graphs(&self) -> &[GraphDefinition] {
        &self.graphs
    }

    /// Every metric paired with the graph it belongs to
    pub fn definitions(&self) -> impl Iterator<Item = (&GraphDefinition, &MetricDefinition)> {
        self.graphs
            .iter()
            .flat_map(|g| g.metrics.iter().map(move |m| (g, m)))
    }

    /// Look up a metric by name
    pub fn definition(&self, name: &str) -> Option<&MetricDefinition> {
        self.definitions().map(|(_, m)| m).find(|m| m.name == name)
    }

    /// Reported response time percentiles
    pub fn percentiles(&self) -> &[u32] {
        &self.percentiles
    }

    /// Status codes summed into `count_4xx`
    pub fn status_4xx(&self) -> &[u16] {
        &self.status_4xx
    }

    /// Status codes summed into `count_5xx`
    pub fn status_5xx(&self) -> &[u16] {
        &self.status_5xx
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::from_config(&CatalogConfig::default())
    }
}

fn dedup<T: Copy + PartialEq>(items: &[T]) -> Vec<T> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(item) {
            out.push(*item);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MetricKind;

    #[test]
    fn test_default_catalog_names() {
        let catalog = Catalog::default();
        let names: Vec<&str> = catalog.definitions().map(|(_, m)| m.name.as_str()).collect();

        assert_eq!(
            names,
            vec![
                "count",
                "count_200",
                "count_403",
                "count_4xx",
                "count_5xx",
                "avg_time",
                "time_percentile_90",
                "time_percentile_95",
                "time_percentile_99",
            ]
        );
    }

    #[test]
    fn test_request_metrics_are_counters() {
        let catalog = Catalog::default();
        for (graph, metric) in catalog.definitions() {
            let expected = if graph.key == REQUESTS_GRAPH {
                MetricKind::Counter
            } else {
                MetricKind::Gauge
            };
            assert_eq!(metric.kind, expected, "{}", metric.name);
        }
    }

    #[test]
    fn test_duplicate_status_codes_are_dropped() {
        let config = CatalogConfig {
            percentiles: vec![99, 90, 99],
            status_4xx: vec![404, 401, 403, 404, 405],
            status_5xx: vec![500],
        };
        let catalog = Catalog::from_config(&config);

        assert_eq!(catalog.status_4xx(), &[404, 401, 403, 405]);
        assert_eq!(catalog.percentiles(), &[99, 90]);
        assert_eq!(catalog.graphs()[1].metrics.len(), 3);
    }

    #[test]
    fn test_definition_lookup() {
        let catalog = Catalog::default();
        assert!(catalog.definition("count_5xx").is_some());
        assert!(catalog.definition("time_percentile_50").is_none());
    }
}
