use crate::file::csv::{error::FileError, settings::CsvSettings};
use model::records::scored::{PREDICTION_COLUMNS, ScoredRecord, is_prediction_column};
use std::{fs, path::Path};
use tracing::info;

/// Writes the row-level result table.
///
/// The header is the input header minus any column named like a prediction
/// column, followed by the four prediction columns. Every row has exactly
/// that many cells, whether it succeeded or not.
pub struct CsvDataSink {
    settings: CsvSettings,
}

impl CsvDataSink {
    pub fn new(settings: CsvSettings) -> Self {
        CsvDataSink { settings }
    }

    pub fn output_headers(input_headers: &[String]) -> Vec<String> {
        input_headers
            .iter()
            .filter(|h| !is_prediction_column(h))
            .cloned()
            .chain(PREDICTION_COLUMNS.iter().map(|c| c.to_string()))
            .collect()
    }

    pub fn write(
        &self,
        path: impl AsRef<Path>,
        input_headers: &[String],
        rows: &[ScoredRecord],
    ) -> Result<(), FileError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let headers = Self::output_headers(input_headers);
        let width = headers.len();

        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.settings.delimiter as u8)
            .from_path(path)
            .map_err(|e| FileError::WriteError(format!("{}: {e}", path.display())))?;

        writer.write_record(&headers)?;

        for row in rows {
            let mut cells: Vec<String> = row.passthrough().map(|f| f.raw.clone()).collect();
            cells.extend(row.prediction.cells().iter().map(|v| v.to_string()));

            if cells.len() != width {
                return Err(FileError::WriteError(format!(
                    "row {} has {} cells, expected {width}",
                    row.index(),
                    cells.len()
                )));
            }
            writer.write_record(&cells)?;
        }

        writer.flush()?;

        info!(path = %path.display(), rows = rows.len(), "Wrote scored rows");
        Ok(())
    }
}

impl Default for CsvDataSink {
    fn default() -> Self {
        CsvDataSink::new(CsvSettings::default())
    }
}
