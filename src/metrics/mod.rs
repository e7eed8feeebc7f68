//! Metric catalog: which metrics exist, how they are grouped, and which
//! upstream status codes feed the class counters.

pub mod catalog;

pub use catalog::{percentile_metric, Catalog};
