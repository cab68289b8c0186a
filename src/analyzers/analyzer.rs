use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::analyzers::aggregate::{aggregate_category, slowest_operations};
use crate::analyzers::classify::{Category, categorize};
use crate::analyzers::types::{RunReport, RunSummary};
use crate::error::{MetricsError, Result};
use crate::parser::{Record, parse_volume_stats};
use crate::stats::{OperationStats, missing_columns};

/// Operations split by category. Excluded rows are only counted.
#[derive(Debug, Default)]
pub struct Partition {
    pub write: Vec<OperationStats>,
    pub read: Vec<OperationStats>,
    pub excluded: usize,
}

/// Classifies every record, keeping input order within each category.
pub fn partition(records: &[Record]) -> Partition {
    let mut partition = Partition::default();

    for record in records {
        let op = OperationStats::from_record(record);
        match categorize(&op.method, &op.name) {
            Category::Write => partition.write.push(op),
            Category::Read => partition.read.push(op),
            Category::Excluded => partition.excluded += 1,
        }
    }

    debug!(
        write = partition.write.len(),
        read = partition.read.len(),
        excluded = partition.excluded,
        "Classified operations"
    );

    partition
}

/// Decodes, classifies and aggregates one stats export.
///
/// `top` limits the slowest-operation lists; zero leaves them empty.
///
/// # Errors
///
/// Returns [`MetricsError::MalformedInput`] if `content` has no data rows.
#[tracing::instrument(skip(content), fields(bytes = content.len()))]
pub fn analyze_source(identifier: &str, content: &str, top: usize) -> Result<RunReport> {
    let records = parse_volume_stats(identifier, content)?;

    if let Some(first) = records.first() {
        let missing = missing_columns(first);
        if !missing.is_empty() {
            warn!(?missing, "Stats export is missing expected columns");
        }
    }

    let ops = partition(&records);

    let summary = RunSummary {
        identifier: identifier.to_string(),
        write: aggregate_category(&ops.write),
        read: aggregate_category(&ops.read),
        produced_at: Utc::now(),
    };

    Ok(RunReport {
        summary,
        slowest_write: slowest_operations(&ops.write, top),
        slowest_read: slowest_operations(&ops.read, top),
    })
}

/// Produces the [`RunSummary`] for one stats export.
pub fn extract_metrics(identifier: &str, content: &str) -> Result<RunSummary> {
    Ok(analyze_source(identifier, content, 0)?.summary)
}

/// Names a run by its parent directory and file name, e.g.
/// `run1/volume_stats.csv`. A bare file name is reported relative to `.`.
pub fn run_identifier(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let parent = match path.parent() {
        Some(p) if p.as_os_str().is_empty() => ".".to_string(),
        Some(p) => p
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        None => String::new(),
    };

    format!("{}/{}", parent, file_name)
}

/// Reads and analyzes one file.
pub fn analyze_file(path: &Path, top: usize) -> Result<RunReport> {
    let content = fs::read_to_string(path).map_err(|source| MetricsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    analyze_source(&run_identifier(path), &content, top)
}

/// Result of processing several inputs, one entry per input in the order
/// given.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub runs: Vec<(PathBuf, Result<RunReport>)>,
}

impl BatchOutcome {
    pub fn reports(&self) -> impl Iterator<Item = &RunReport> {
        self.runs.iter().filter_map(|(_, run)| run.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &MetricsError)> {
        self.runs
            .iter()
            .filter_map(|(path, run)| run.as_ref().err().map(|e| (path.as_path(), e)))
    }

    /// Summaries of the inputs that succeeded, in input order.
    pub fn into_summaries(self) -> Vec<RunSummary> {
        self.runs
            .into_iter()
            .filter_map(|(_, run)| run.ok().map(|report| report.summary))
            .collect()
    }
}

/// Processes each path in order. A failing input is recorded without
/// stopping the rest of the batch; reporting it is left to the caller.
pub fn summarize_files<P: AsRef<Path>>(paths: &[P], top: usize) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for path in paths {
        let path = path.as_ref();
        let run = analyze_file(path, top);
        match &run {
            Ok(report) => info!(run = %report.summary.identifier, "Run summarized"),
            Err(e) => debug!(path = %path.display(), error = %e, "Stats file failed"),
        }
        outcome.runs.push((path.to_path_buf(), run));
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Type,Name,Request Count,Median Response Time,95%
GET,/students,5,50,80
GET,/schools,5,150,120
POST,/oauth/token,100,900,900
,Aggregated,110,100,100
";

    #[test]
    fn test_extract_metrics_reads_only() {
        let summary = extract_metrics("run/volume_stats.csv", SAMPLE).unwrap();

        let read = summary.read.unwrap();
        assert_eq!(read.median, 100);
        assert_eq!(read.p95, 100);
        assert_eq!(read.request_count, 10);
        assert_eq!(read.operation_count, 2);
        assert!(summary.write.is_none());
        assert_eq!(summary.identifier, "run/volume_stats.csv");
    }

    #[test]
    fn test_extract_metrics_with_bom_header() {
        let text = format!("\u{FEFF}{}", SAMPLE);
        let summary = extract_metrics("bom/volume_stats.csv", &text).unwrap();

        let read = summary.read.unwrap();
        assert_eq!(read.median, 100);
        assert_eq!(read.request_count, 10);
    }

    #[test]
    fn test_partition_counts_excluded() {
        let records = parse_volume_stats("t", SAMPLE).unwrap();
        let ops = partition(&records);
        assert_eq!(ops.read.len(), 2);
        assert!(ops.write.is_empty());
        assert_eq!(ops.excluded, 2);
    }

    #[test]
    fn test_zero_traffic_category_is_absent() {
        let text = "Type,Name,Request Count,Median Response Time,95%\nPOST,/a,0,10,20\nGET,/b,n/a,5,5";
        let summary = extract_metrics("t", text).unwrap();
        assert!(summary.write.is_none());
        assert!(summary.read.is_none());
    }

    #[test]
    fn test_malformed_input_propagates() {
        let err = extract_metrics("t", "Type,Name").unwrap_err();
        assert!(matches!(err, MetricsError::MalformedInput { .. }));
    }

    #[test]
    fn test_analyze_source_top() {
        let report = analyze_source("t", SAMPLE, 1).unwrap();
        assert_eq!(report.slowest_read.len(), 1);
        assert_eq!(report.slowest_read[0].name, "/schools");
        assert!(report.slowest_write.is_empty());
    }

    #[test]
    fn test_run_identifier() {
        assert_eq!(
            run_identifier(Path::new("results/run1/volume_stats.csv")),
            "run1/volume_stats.csv"
        );
        assert_eq!(
            run_identifier(Path::new("volume_stats.csv")),
            "./volume_stats.csv"
        );
        assert_eq!(
            run_identifier(Path::new("/volume_stats.csv")),
            "/volume_stats.csv"
        );
    }

    #[test]
    fn test_summarize_files_isolates_failures() {
        let dir = std::env::temp_dir().join("volume_metrics_test_batch");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();

        let good = dir.join("good.csv");
        let bad = dir.join("bad.csv");
        let missing = dir.join("missing.csv");
        fs::write(&good, SAMPLE).unwrap();
        fs::write(&bad, "Type,Name\n").unwrap();

        let outcome = summarize_files(&[&bad, &good, &missing], 0);

        assert_eq!(outcome.runs.len(), 3);
        assert_eq!(outcome.runs[0].0, bad);
        assert!(matches!(
            outcome.runs[0].1,
            Err(MetricsError::MalformedInput { .. })
        ));
        assert!(outcome.runs[1].1.is_ok());
        assert!(matches!(outcome.runs[2].1, Err(MetricsError::Io { .. })));

        assert_eq!(outcome.failures().count(), 2);
        let reports: Vec<_> = outcome.reports().collect();
        assert_eq!(reports.len(), 1);
        assert_eq!(
            reports[0].summary.identifier,
            "volume_metrics_test_batch/good.csv"
        );

        let summaries = outcome.into_summaries();
        assert_eq!(summaries.len(), 1);

        fs::remove_dir_all(&dir).unwrap();
    }
}
