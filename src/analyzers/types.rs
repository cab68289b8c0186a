//! Data types produced by the aggregation pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::stats::OperationStats;

/// Request-weighted latency summary for one category of operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub median: u64,
    pub p95: u64,
    pub request_count: u64,
    pub operation_count: usize,
}

/// Summary of one stats export. `None` in a category means no qualifying
/// traffic was recorded for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub identifier: String,
    pub write: Option<CategorySummary>,
    pub read: Option<CategorySummary>,
    pub produced_at: DateTime<Utc>,
}

/// A run summary together with the slowest operations behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub summary: RunSummary,
    pub slowest_write: Vec<OperationStats>,
    pub slowest_read: Vec<OperationStats>,
}

/// One run's slot in a comparison series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonEntry {
    pub label: String,
    pub summary: Option<CategorySummary>,
}

/// Runs aligned by position, one series per category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonView {
    pub write: Vec<ComparisonEntry>,
    pub read: Vec<ComparisonEntry>,
}

/// Chart-ready series for one category. Only runs with data appear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub median: Vec<u64>,
    pub p95: Vec<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartData {
    pub write: ChartSeries,
    pub read: ChartSeries,
}

/// A row of the flat comparison table. Empty cells are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatRow {
    #[serde(rename = "Run")]
    pub run: String,
    #[serde(rename = "Write_Median_ms")]
    pub write_median_ms: Option<u64>,
    #[serde(rename = "Write_P95_ms")]
    pub write_p95_ms: Option<u64>,
    #[serde(rename = "Read_Median_ms")]
    pub read_median_ms: Option<u64>,
    #[serde(rename = "Read_P95_ms")]
    pub read_p95_ms: Option<u64>,
}
