//! CLI entry point for the volume metrics tool.
//!
//! Summarizes one or more Locust `volume_stats.csv` exports into weighted
//! read/write latency figures and, for several runs, compares them.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use volume_metrics::analyzers::analyzer::summarize_files;
use volume_metrics::analyzers::compare::{compare_runs, flat_rows};
use volume_metrics::analyzers::types::{ChartData, RunSummary};
use volume_metrics::config::{Config, DEFAULT_LOG_FILE_PATH, DEFAULT_STATS_PATH};
use volume_metrics::output::{
    chart_json, export_files, flat_csv, format_comparison_table, format_run_block,
};

#[derive(Parser)]
#[command(name = "volume_metrics")]
#[command(
    about = "Summarize read/write latency from load-test stats exports",
    long_about = None
)]
struct Cli {
    /// Stats CSV files, one per test run, in run order
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// File to read when no FILE is given
    #[arg(long, env = "VOLUME_STATS_DEFAULT_PATH", default_value = DEFAULT_STATS_PATH)]
    default_path: PathBuf,

    /// Rolling JSON log file
    #[arg(long, env = "LOG_FILE_PATH", default_value = DEFAULT_LOG_FILE_PATH)]
    log_file: PathBuf,

    /// Also write chart JSON to this file (needs at least two runs)
    #[arg(long, value_name = "PATH")]
    json_out: Option<PathBuf>,

    /// Also write the flat comparison table to this CSV file
    #[arg(long, value_name = "PATH")]
    csv_out: Option<PathBuf>,

    /// List the N slowest operations per category for each run
    #[arg(long, default_value_t = 0)]
    top: usize,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let cli = Cli::parse();
    let config = Config {
        default_path: cli.default_path.clone(),
        log_file_path: cli.log_file.clone(),
    };

    // Logging setup: colored stderr + JSON rolling log file
    let (log_dir, log_file_name) = config.log_location();
    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new("info")));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(
            EnvFilter::try_from_env("RUST_LOG_JSON").unwrap_or_else(|_| EnvFilter::new("debug")),
        );

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let Some(inputs) = config.resolve_inputs(cli.files) else {
        eprintln!("Usage: volume_metrics <path-to-volume_stats.csv> [more-files...]");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  volume_metrics DmsTestResults/volume_stats.csv");
        eprintln!("  volume_metrics run1/volume_stats.csv run2/volume_stats.csv");
        eprintln!();
        eprintln!(
            "No FILE given and default path {} does not exist",
            config.default_path.display()
        );
        std::process::exit(1);
    };

    info!(inputs = inputs.len(), "Processing stats files");

    let outcome = summarize_files(&inputs, cli.top);
    for (path, run) in &outcome.runs {
        match run {
            Ok(report) => println!("{}", format_run_block(report)),
            Err(e) => eprintln!("\nError processing {}: {}", path.display(), e),
        }
    }
    let failed = outcome.failures().count();
    let runs: Vec<RunSummary> = outcome.into_summaries();

    if runs.len() > 1 {
        println!("{}", format_comparison_table(&compare_runs(&runs)));

        println!("\n\n{}", "=".repeat(70));
        println!("JSON OUTPUT (for charting libraries)");
        println!("{}", "=".repeat(70));
        println!("{}", chart_json(&ChartData::from_runs(&runs))?);
    }

    if !runs.is_empty() {
        println!("\n\n{}", "=".repeat(70));
        println!("CSV FORMAT (copy to Excel/Google Sheets)");
        println!("{}", "=".repeat(70));
        print!("{}", flat_csv(&flat_rows(&runs))?);
    }

    let failed_exports = export_files(&runs, cli.json_out.as_deref(), cli.csv_out.as_deref());

    info!(
        succeeded = runs.len(),
        failed,
        failed_exports,
        "Finished processing stats files"
    );
    Ok(())
}
