//! Response body of chocon's `/.api/http-stats` endpoint.
//!
//! Maps with integer keys arrive as JSON objects with string keys
//! (`{"200": 12}`); serde_json parses those keys back into integers.

use serde::Deserialize;
use std::collections::HashMap;

/// Top-level stats document
#[derive(Debug, Clone, Deserialize)]
pub struct HttpStats {
    /// Request side counters
    pub request: RequestStats,
    /// Response side timings and sizes
    pub response: ResponseStats,
}

/// Request counters since the proxy started
#[derive(Debug, Clone, Deserialize)]
pub struct RequestStats {
    /// Total number of requests
    pub count: u64,
    /// Requests per HTTP status code
    #[serde(default)]
    pub status_count: Option<HashMap<u16, u64>>,
}

/// Response timings, seconds
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseStats {
    /// Mean response time
    pub average_time: f64,
    /// Response time by percentile rank
    #[serde(default)]
    pub percentiled_time: Option<HashMap<u32, f64>>,
    /// Slowest response
    #[serde(default)]
    pub max_time: Option<f64>,
    /// Fastest response
    #[serde(default)]
    pub min_time: Option<f64>,
    /// Mean body size, bytes
    #[serde(default)]
    pub average_size: Option<f64>,
}

impl RequestStats {
    /// Requests seen for one status code, zero when absent
    pub fn status(&self, code: u16) -> u64 {
        self.status_count
            .as_ref()
            .and_then(|counts| counts.get(&code))
            .copied()
            .unwrap_or(0)
    }

    /// Sum over a set of status codes; each listed code is counted once
    pub fn sum_statuses(&self, codes: &[u16]) -> u64 {
        codes.iter().map(|code| self.status(*code)).sum()
    }
}

impl ResponseStats {
    /// Response time at a percentile rank, zero when absent
    pub fn percentile(&self, rank: u32) -> f64 {
        self.percentiled_time
            .as_ref()
            .and_then(|times| times.get(&rank))
            .copied()
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "request": {"count": 56, "status_count": {"200": 50, "403": 2, "404": 3, "500": 1}},
        "response": {
            "max_time": 0.9, "min_time": 0.001, "average_time": 0.042,
            "percentiled_time": {"90": 0.1, "95": 0.2, "99": 0.5},
            "max_size": 2048, "min_size": 0, "average_size": 312.5
        }
    }"#;

    #[test]
    fn test_decode_full_body() {
        let stats: HttpStats = serde_json::from_str(BODY).unwrap();

        assert_eq!(stats.request.count, 56);
        assert_eq!(stats.request.status(404), 3);
        assert_eq!(stats.request.status(502), 0);
        assert_eq!(stats.response.percentile(95), 0.2);
        assert_eq!(stats.response.max_time, Some(0.9));
    }

    #[test]
    fn test_null_maps_decode_as_empty() {
        let body = r#"{
            "request": {"count": 0, "status_count": null},
            "response": {"average_time": 0, "percentiled_time": null}
        }"#;
        let stats: HttpStats = serde_json::from_str(body).unwrap();

        assert_eq!(stats.request.sum_statuses(&[200, 404]), 0);
        assert_eq!(stats.response.percentile(99), 0.0);
    }

    #[test]
    fn test_missing_request_section_fails() {
        let result = serde_json::from_str::<HttpStats>(r#"{"response": {"average_time": 1.0}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_sum_statuses() {
        let stats: HttpStats = serde_json::from_str(BODY).unwrap();
        assert_eq!(stats.request.sum_statuses(&[404, 401, 405]), 3);
        assert_eq!(stats.request.sum_statuses(&[500, 502, 503, 504]), 1);
    }
}
