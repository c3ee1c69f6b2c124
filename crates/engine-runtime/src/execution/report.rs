use crate::error::BatchError;
use connectors::file::csv::sink::CsvDataSink;
use engine_config::{error::ReportGenerationError, report::summary::RunSummary};
use model::records::scored::ScoredRecord;
use std::{fs, path::Path};
use tracing::info;

/// Persists the two artifacts of a run: the scored table and the JSON
/// summary. Each file is written once, in full.
#[derive(Default)]
pub struct ReportEmitter {
    sink: CsvDataSink,
}

impl ReportEmitter {
    pub fn emit(
        &self,
        input_headers: &[String],
        rows: &[ScoredRecord],
        summary: &RunSummary,
        output_path: &Path,
        summary_path: &Path,
    ) -> Result<(), BatchError> {
        self.sink
            .write(output_path, input_headers, rows)
            .map_err(BatchError::Output)?;
        write_summary(summary, summary_path)?;
        Ok(())
    }
}

pub fn write_summary(summary: &RunSummary, path: &Path) -> Result<(), ReportGenerationError> {
    let json = summary.to_json_pretty()?;
    let write_err = |source| ReportGenerationError::Write {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, json).map_err(write_err)?;

    info!(path = %path.display(), "Wrote run summary");
    Ok(())
}
