//! Error types returned by the library.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsError {
    /// The source did not contain a header line and at least one data line.
    #[error("{source_id}: CSV file must have header and data rows (found {lines} line(s))")]
    MalformedInput { source_id: String, lines: usize },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, MetricsError>;
