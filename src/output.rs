//! Report rendering and export for run summaries.
//!
//! Supports a per-run text block, a cross-run comparison table, chart JSON,
//! and the flat comparison CSV (as text or written to a file).

use anyhow::Result;
use csv::WriterBuilder;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::{debug, error, info, warn};

use crate::analyzers::compare::flat_rows;
use crate::analyzers::types::{
    CategorySummary, ChartData, ComparisonEntry, ComparisonView, FlatRow, RunReport, RunSummary,
};
use crate::stats::OperationStats;

const RULE_WIDTH: usize = 70;

const WRITE_HEADING: &str = "WRITE OPERATIONS (POST/PUT/DELETE)";
const READ_HEADING: &str = "READ OPERATIONS (GET)";

fn rule(ch: char) -> String {
    ch.to_string().repeat(RULE_WIDTH)
}

/// Formats an integer with `,` thousands separators.
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn write_category(
    out: &mut String,
    heading: &str,
    summary: Option<&CategorySummary>,
    slowest: &[OperationStats],
) {
    let Some(s) = summary else {
        let _ = writeln!(out, "\n{}: No data found", heading);
        return;
    };

    let _ = writeln!(out, "\n{}", heading);
    let _ = writeln!(out, "   Median Response Time: {}ms", s.median);
    let _ = writeln!(out, "   95th Percentile:      {}ms", s.p95);
    let _ = writeln!(out, "   Total Requests:       {}", format_thousands(s.request_count));
    let _ = writeln!(out, "   Operations Tested:    {}", s.operation_count);

    if !slowest.is_empty() {
        let _ = writeln!(out, "   Slowest by median:");
        for op in slowest {
            let _ = writeln!(
                out,
                "     {:<40} {:>6}ms {:>6}ms  {}",
                format!("{} {}", op.method, op.name),
                op.median_ms,
                op.p95_ms,
                format_thousands(op.request_count)
            );
        }
    }
}

/// Human-readable summary of a single run.
pub fn format_run_block(report: &RunReport) -> String {
    let summary = &report.summary;
    let mut out = String::new();

    let _ = writeln!(out, "\n{}", rule('='));
    let _ = writeln!(out, "File: {}", summary.identifier);
    let _ = writeln!(out, "{}", rule('='));

    write_category(
        &mut out,
        WRITE_HEADING,
        summary.write.as_ref(),
        &report.slowest_write,
    );
    write_category(
        &mut out,
        READ_HEADING,
        summary.read.as_ref(),
        &report.slowest_read,
    );

    out
}

fn write_comparison_section(out: &mut String, heading: &str, entries: &[ComparisonEntry]) {
    let _ = writeln!(out, "\n{}:", heading);
    let _ = writeln!(out, "{}", rule('-'));
    let _ = writeln!(out, "{:<30}{:<12}{:<12}Requests", "Run", "Median", "P95");
    let _ = writeln!(out, "{}", rule('-'));

    for entry in entries {
        match &entry.summary {
            Some(s) => {
                let _ = writeln!(
                    out,
                    "{:<30}{:<12}{:<12}{}",
                    entry.label,
                    format!("{}ms", s.median),
                    format!("{}ms", s.p95),
                    format_thousands(s.request_count)
                );
            }
            None => {
                let _ = writeln!(out, "{:<30}No data", entry.label);
            }
        }
    }
}

/// Side-by-side table of every run, write section first.
pub fn format_comparison_table(view: &ComparisonView) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "\n\n{}", rule('='));
    let _ = writeln!(out, "COMPARISON ACROSS TEST RUNS");
    let _ = writeln!(out, "{}", rule('='));

    write_comparison_section(&mut out, WRITE_HEADING, &view.write);
    write_comparison_section(&mut out, READ_HEADING, &view.read);

    out
}

/// Pretty-printed chart JSON with two-space indentation.
pub fn chart_json(chart: &ChartData) -> Result<String> {
    Ok(serde_json::to_string_pretty(chart)?)
}

/// Writes chart JSON to `path`, replacing any existing file.
pub fn write_chart_json(path: &Path, chart: &ChartData) -> Result<()> {
    debug!(path = %path.display(), "Writing chart JSON");
    fs::write(path, chart_json(chart)?)?;
    Ok(())
}

/// Renders the flat comparison table as CSV text, header included.
pub fn flat_csv(rows: &[FlatRow]) -> Result<String> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// Writes the flat comparison table to a CSV file, replacing any existing file.
pub fn write_flat_csv(path: &Path, rows: &[FlatRow]) -> Result<()> {
    debug!(path = %path.display(), rows = rows.len(), "Writing comparison CSV");

    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes the requested export files. Every export is attempted even when an
/// earlier one fails; failures are logged and their count returned.
///
/// Chart JSON needs at least two runs, the flat CSV at least one.
pub fn export_files(runs: &[RunSummary], json_out: Option<&Path>, csv_out: Option<&Path>) -> usize {
    let mut failed = 0;

    if let Some(path) = json_out {
        if runs.len() > 1 {
            match write_chart_json(path, &ChartData::from_runs(runs)) {
                Ok(()) => info!(path = %path.display(), "Chart JSON written"),
                Err(e) => {
                    error!(path = %path.display(), error = %e, "Failed to write chart JSON");
                    failed += 1;
                }
            }
        } else {
            warn!("Chart JSON needs at least two successful runs, skipping --json-out");
        }
    }

    if let Some(path) = csv_out {
        if !runs.is_empty() {
            match write_flat_csv(path, &flat_rows(runs)) {
                Ok(()) => info!(path = %path.display(), "Comparison CSV written"),
                Err(e) => {
                    error!(path = %path.display(), error = %e, "Failed to write comparison CSV");
                    failed += 1;
                }
            }
        }
    }

    failed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::compare::compare_runs;
    use chrono::Utc;
    use std::env;

    fn temp_path(name: &str) -> std::path::PathBuf {
        env::temp_dir().join(name)
    }

    fn sample_summary(request_count: u64) -> CategorySummary {
        CategorySummary {
            median: 42,
            p95: 120,
            request_count,
            operation_count: 3,
        }
    }

    fn runs() -> Vec<RunSummary> {
        vec![
            RunSummary {
                identifier: "run1/volume_stats.csv".to_string(),
                write: Some(sample_summary(12345)),
                read: None,
                produced_at: Utc::now(),
            },
            RunSummary {
                identifier: "run2/volume_stats.csv".to_string(),
                write: None,
                read: Some(sample_summary(7)),
                produced_at: Utc::now(),
            },
        ]
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_format_run_block() {
        let report = RunReport {
            summary: runs().remove(0),
            slowest_write: vec![OperationStats {
                method: "POST".to_string(),
                name: "/students".to_string(),
                request_count: 5000,
                median_ms: 80,
                p95_ms: 200,
            }],
            slowest_read: vec![],
        };
        let text = format_run_block(&report);

        assert!(text.contains("File: run1/volume_stats.csv"));
        assert!(text.contains("Median Response Time: 42ms"));
        assert!(text.contains("Total Requests:       12,345"));
        assert!(text.contains("POST /students"));
        assert!(text.contains("READ OPERATIONS (GET): No data found"));
    }

    #[test]
    fn test_format_comparison_table_marks_missing() {
        let text = format_comparison_table(&compare_runs(&runs()));
        let no_data = text.lines().filter(|l| l.ends_with("No data")).count();
        assert_eq!(no_data, 2);
        assert!(text.contains("12,345"));
    }

    #[test]
    fn test_flat_csv_blank_cells() {
        let text = flat_csv(&flat_rows(&runs())).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(
            lines[0],
            "Run,Write_Median_ms,Write_P95_ms,Read_Median_ms,Read_P95_ms"
        );
        assert_eq!(lines[1], "Run 1,42,120,,");
        assert_eq!(lines[2], "Run 2,,,42,120");
    }

    #[test]
    fn test_write_flat_csv_replaces_file() {
        let path = temp_path("volume_metrics_test_flat.csv");
        let _ = fs::remove_file(&path);

        let rows = flat_rows(&runs());
        write_flat_csv(&path, &rows).unwrap();
        write_flat_csv(&path, &rows).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 3);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_chart_json() {
        let path = temp_path("volume_metrics_test_chart.json");
        let _ = fs::remove_file(&path);

        let chart = ChartData::from_runs(&runs());
        write_chart_json(&path, &chart).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["write"]["labels"][0], "Run 1");
        assert_eq!(value["read"]["labels"][0], "Run 2");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_export_files_continues_after_failure() {
        let json_path = temp_path("volume_metrics_no_such_dir/chart.json");
        let csv_path = temp_path("volume_metrics_test_export.csv");
        let _ = fs::remove_file(&csv_path);

        let failed = export_files(&runs(), Some(&json_path), Some(&csv_path));

        assert_eq!(failed, 1);
        let content = fs::read_to_string(&csv_path).unwrap();
        assert_eq!(content.lines().count(), 3);

        fs::remove_file(&csv_path).unwrap();
    }

    #[test]
    fn test_export_files_skips_chart_for_single_run() {
        let json_path = temp_path("volume_metrics_test_single_chart.json");
        let _ = fs::remove_file(&json_path);

        let failed = export_files(&runs()[..1], Some(&json_path), None);

        assert_eq!(failed, 0);
        assert!(!json_path.exists());
    }
}
