use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Files read and written by one batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    pub input: PathBuf,
    pub output: PathBuf,
    pub summary: PathBuf,
}

impl RunPaths {
    /// Fills in the default output and summary names, stamped with `now`.
    pub fn resolve(
        input: impl Into<PathBuf>,
        output: Option<PathBuf>,
        summary: Option<PathBuf>,
        now: DateTime<Local>,
    ) -> Self {
        let input = input.into();
        let output = output.unwrap_or_else(|| default_output_path(&input, now));
        let summary = summary.unwrap_or_else(|| default_summary_path(now));
        RunPaths {
            input,
            output,
            summary,
        }
    }
}

/// `scored_<input stem>_<YYYYmmdd_HHMMSS>.csv` in the working directory.
pub fn default_output_path(input: &Path, now: DateTime<Local>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "input".to_string());
    PathBuf::from(format!("scored_{stem}_{}.csv", now.format(STAMP_FORMAT)))
}

/// `batch_summary_<YYYYmmdd_HHMMSS>.json` in the working directory.
pub fn default_summary_path(now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!("batch_summary_{}.json", now.format(STAMP_FORMAT)))
}
