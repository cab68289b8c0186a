//! Cross-run views over an ordered list of run summaries.
//!
//! Runs are labelled `Run 1`, `Run 2`, ... by position and are never
//! reordered.

use crate::analyzers::types::{
    CategorySummary, ChartData, ChartSeries, ComparisonEntry, ComparisonView, FlatRow, RunSummary,
};

pub fn run_label(index: usize) -> String {
    format!("Run {}", index + 1)
}

/// Builds one entry per run per category. A run without data for a category
/// keeps its slot with `summary: None`.
pub fn compare_runs(runs: &[RunSummary]) -> ComparisonView {
    ComparisonView {
        write: series(runs, |run| run.write),
        read: series(runs, |run| run.read),
    }
}

fn series(
    runs: &[RunSummary],
    pick: impl Fn(&RunSummary) -> Option<CategorySummary>,
) -> Vec<ComparisonEntry> {
    runs.iter()
        .enumerate()
        .map(|(i, run)| ComparisonEntry {
            label: run_label(i),
            summary: pick(run),
        })
        .collect()
}

impl ChartSeries {
    fn from_entries(entries: &[ComparisonEntry]) -> Self {
        let mut series = ChartSeries::default();
        for entry in entries {
            if let Some(summary) = entry.summary {
                series.labels.push(entry.label.clone());
                series.median.push(summary.median);
                series.p95.push(summary.p95);
            }
        }
        series
    }
}

impl ChartData {
    /// Chart series keep only the runs that have data for the category.
    pub fn from_view(view: &ComparisonView) -> Self {
        ChartData {
            write: ChartSeries::from_entries(&view.write),
            read: ChartSeries::from_entries(&view.read),
        }
    }

    pub fn from_runs(runs: &[RunSummary]) -> Self {
        Self::from_view(&compare_runs(runs))
    }
}

/// Rows for the flat `Run,Write_Median_ms,...` table, one per run.
pub fn flat_rows(runs: &[RunSummary]) -> Vec<FlatRow> {
    runs.iter()
        .enumerate()
        .map(|(i, run)| FlatRow {
            run: run_label(i),
            write_median_ms: run.write.map(|s| s.median),
            write_p95_ms: run.write.map(|s| s.p95),
            read_median_ms: run.read.map(|s| s.median),
            read_p95_ms: run.read.map(|s| s.p95),
        })
        .collect()
}
