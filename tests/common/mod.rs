//! Common test utilities and fixtures.

#![allow(dead_code)]

use chocon_plugin::core::{Config, ConfigBuilder, MetricSnapshot};
use serde_json::{json, Value};
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builder for chocon stats bodies with sensible defaults.
pub struct StatsBodyBuilder {
    count: u64,
    statuses: Vec<(u16, u64)>,
    average_time: f64,
    percentiles: Vec<(u32, f64)>,
}

impl StatsBodyBuilder {
    pub fn new(count: u64) -> Self {
        Self {
            count,
            statuses: vec![(200, count)],
            average_time: 0.05,
            percentiles: vec![(90, 0.1), (95, 0.2), (99, 0.4)],
        }
    }

    pub fn statuses(mut self, statuses: &[(u16, u64)]) -> Self {
        self.statuses = statuses.to_vec();
        self
    }

    pub fn average_time(mut self, average_time: f64) -> Self {
        self.average_time = average_time;
        self
    }

    pub fn build(self) -> Value {
        let status_count: serde_json::Map<String, Value> = self
            .statuses
            .iter()
            .map(|(code, n)| (code.to_string(), json!(n)))
            .collect();
        let percentiled_time: serde_json::Map<String, Value> = self
            .percentiles
            .iter()
            .map(|(p, t)| (p.to_string(), json!(t)))
            .collect();

        json!({
            "request": {"count": self.count, "status_count": status_count},
            "response": {
                "max_time": 1.0,
                "min_time": 0.001,
                "average_time": self.average_time,
                "percentiled_time": percentiled_time
            }
        })
    }
}

/// Serve `response` from the stats path.
pub async fn mount_stats(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/.api/http-stats"))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Configuration pointing at `server`, persisting to `tempfile`.
pub fn config_for(server: &MockServer, tempfile: &Path) -> Config {
    let addr = server.address();
    ConfigBuilder::new()
        .host(addr.ip().to_string())
        .port(addr.port())
        .tempfile(tempfile)
        .build()
        .unwrap()
}

/// Snapshot with a single `count` value.
pub fn count_snapshot(count: f64, timestamp: i64) -> MetricSnapshot {
    let mut snapshot = MetricSnapshot::new();
    snapshot.insert("count", count, timestamp);
    snapshot
}

/// Parse plugin output into `(name, value, timestamp)` triples.
pub fn parse_output(out: &[u8]) -> Vec<(String, f64, i64)> {
    String::from_utf8_lossy(out)
        .lines()
        .map(|line| {
            let fields: Vec<&str> = line.split('\t').collect();
            assert_eq!(fields.len(), 3, "malformed line: {:?}", line);
            (
                fields[0].to_string(),
                fields[1].parse().unwrap(),
                fields[2].parse().unwrap(),
            )
        })
        .collect()
}

/// Look up a reported value by full metric name.
pub fn reported(lines: &[(String, f64, i64)], name: &str) -> Option<f64> {
    lines.iter().find(|(n, _, _)| n == name).map(|(_, v, _)| *v)
}
