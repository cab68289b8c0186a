use std::path::{Path, PathBuf};

/// Stats export read when no input files are given.
pub const DEFAULT_STATS_PATH: &str = "DmsTestResults/volume_stats.csv";
pub const DEFAULT_LOG_FILE_PATH: &str = "logs/volume_metrics.log";

/// Runtime settings, resolved once at startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    pub default_path: PathBuf,
    pub log_file_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_path: PathBuf::from(DEFAULT_STATS_PATH),
            log_file_path: PathBuf::from(DEFAULT_LOG_FILE_PATH),
        }
    }
}

impl Config {
    /// Picks the inputs to process: the given files if any, otherwise the
    /// default path when it exists. `None` means there is nothing to read.
    pub fn resolve_inputs(&self, files: Vec<PathBuf>) -> Option<Vec<PathBuf>> {
        if !files.is_empty() {
            return Some(files);
        }

        if self.default_path.exists() {
            Some(vec![self.default_path.clone()])
        } else {
            None
        }
    }

    /// Directory and file name for the rolling JSON log.
    pub fn log_location(&self) -> (&Path, &Path) {
        let dir = self
            .log_file_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("logs"));
        let file = self
            .log_file_path
            .file_name()
            .map(Path::new)
            .unwrap_or(Path::new("volume_metrics.log"));
        (dir, file)
    }
}
