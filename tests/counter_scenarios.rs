//! Counter rate scenarios across consecutive invocations.
//!
//! Each step builds a fresh reporter over the same snapshot file, the way
//! successive plugin processes would.

use chocon_plugin::collector::{snapshot_from_stats, HttpStats};
use chocon_plugin::core::MetricSnapshot;
use chocon_plugin::metrics::Catalog;
use chocon_plugin::reporter::{FileSnapshotStore, Reporter, SnapshotStore};
use pretty_assertions::assert_eq;
use std::path::Path;
use tempfile::TempDir;

mod common;
use common::*;

const COUNT: &str = "chocon.http.requests.count";

fn invoke(path: &Path, current: &MetricSnapshot) -> Vec<(String, f64, i64)> {
    let catalog = Catalog::default();
    let reporter = Reporter::new(&catalog, "chocon", FileSnapshotStore::new(path));
    let mut out = Vec::new();
    reporter.report(current, &mut out).unwrap();
    parse_output(&out)
}

fn decode(body: serde_json::Value) -> HttpStats {
    serde_json::from_str(&body.to_string()).unwrap()
}

#[test]
fn test_first_second_and_reset_runs() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("chocon.json");

    // First run: no prior data, counter omitted, raw value persisted
    let lines = invoke(&path, &count_snapshot(100.0, 1000));
    assert_eq!(reported(&lines, COUNT), None);
    let stored = FileSnapshotStore::new(&path).load().unwrap().unwrap();
    assert_eq!(stored, count_snapshot(100.0, 1000));

    // 60s later: (160 - 100) / 60
    let lines = invoke(&path, &count_snapshot(160.0, 1060));
    assert_eq!(reported(&lines, COUNT), Some(1.0));
    assert_eq!(lines[0].2, 1060);

    // Upstream restarted: 10 / 60, never negative
    let lines = invoke(&path, &count_snapshot(10.0, 1120));
    let rate = reported(&lines, COUNT).unwrap();
    assert!((rate - 10.0 / 60.0).abs() < 1e-9, "rate was {}", rate);
}

#[test]
fn test_extreme_stored_timestamp_omits_counter() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("chocon.json");
    std::fs::write(
        &path,
        r#"{"count":{"value":1.0,"timestamp":-9223372036854775808}}"#,
    )
    .unwrap();

    let lines = invoke(&path, &count_snapshot(5.0, 1000));
    assert_eq!(reported(&lines, COUNT), None);

    let stored = FileSnapshotStore::new(&path).load().unwrap().unwrap();
    assert_eq!(stored, count_snapshot(5.0, 1000));
}

#[test]
fn test_rate_matches_formula() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("chocon.json");

    for (a, b, t0, t1) in [(0.0, 0.0, 0, 1), (5.0, 65.0, 100, 130), (1.0e9, 1.5e9, 0, 86_400)] {
        FileSnapshotStore::new(&path)
            .persist(&count_snapshot(a, t0))
            .unwrap();
        let lines = invoke(&path, &count_snapshot(b, t1));
        let expected = (b - a) / (t1 - t0) as f64;
        assert_eq!(reported(&lines, COUNT), Some(expected));
    }
}

#[test]
fn test_corrupt_snapshot_behaves_like_first_run() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("chocon.json");
    std::fs::write(&path, "garbage").unwrap();

    let lines = invoke(&path, &count_snapshot(100.0, 1000));
    assert!(lines.is_empty());

    let lines = invoke(&path, &count_snapshot(130.0, 1030));
    assert_eq!(reported(&lines, COUNT), Some(1.0));
}

#[test]
fn test_status_classes_through_full_cycle() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("chocon.json");
    let catalog = Catalog::default();

    let before = decode(StatsBodyBuilder::new(0).statuses(&[]).build());
    let after = decode(
        StatsBodyBuilder::new(56)
            .statuses(&[(200, 50), (403, 2), (404, 3), (500, 1)])
            .build(),
    );

    invoke(&path, &snapshot_from_stats(&before, &catalog, 0));
    let lines = invoke(&path, &snapshot_from_stats(&after, &catalog, 1));

    assert_eq!(reported(&lines, "chocon.http.requests.count_200"), Some(50.0));
    assert_eq!(reported(&lines, "chocon.http.requests.count_403"), Some(2.0));
    assert_eq!(reported(&lines, "chocon.http.requests.count_4xx"), Some(3.0));
    assert_eq!(reported(&lines, "chocon.http.requests.count_5xx"), Some(1.0));
    assert_eq!(reported(&lines, "chocon.http.latency.time_percentile_99"), Some(0.4));
}
