use crate::file::csv::{
    error::FileError,
    metadata::{CsvMetadata, infer_columns},
    settings::CsvSettings,
};
use model::{core::value::FieldValue, records::customer::CustomerRecord};
use std::{collections::HashSet, fs::File, path::Path};
use tracing::{debug, info};

/// A fully loaded input table.
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub metadata: CsvMetadata,
    pub records: Vec<CustomerRecord>,
}

impl CsvTable {
    pub fn headers(&self) -> Vec<String> {
        self.metadata.headers()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Reads the input table of a batch run.
pub struct CsvDataSource {
    path: String,
    settings: CsvSettings,
}

impl CsvDataSource {
    pub fn new(path: impl AsRef<Path>, settings: CsvSettings) -> Self {
        CsvDataSource {
            path: path.as_ref().display().to_string(),
            settings,
        }
    }

    /// Reads every record, infers column types and converts each row into a
    /// [`CustomerRecord`] indexed by its position.
    ///
    /// Fails on a missing file, a missing or duplicated header, or a row whose
    /// width differs from the header.
    pub fn load(&self) -> Result<CsvTable, FileError> {
        let start = std::time::Instant::now();
        let file = File::open(&self.path).map_err(|e| FileError::from_open(&self.path, e))?;

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.settings.delimiter as u8)
            .has_headers(self.settings.has_headers)
            .flexible(false)
            .from_reader(file);

        let headers = self.read_headers(&mut reader)?;

        let mut raw_records = Vec::new();
        for (line, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                FileError::ReadError(format!("Error reading CSV record {line}: {e}"))
            })?;
            raw_records.push(record);
        }

        let columns = infer_columns(&headers, &raw_records);
        for column in &columns {
            debug!(
                column = %column.name,
                data_type = %column.data_type,
                nullable = column.is_nullable,
                "Inferred column type"
            );
        }

        let records = raw_records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let fields = columns
                    .iter()
                    .map(|col| {
                        let cell = record.get(col.ordinal).unwrap_or("");
                        FieldValue::new(col.name.clone(), col.data_type.get_value(cell), cell)
                    })
                    .collect();
                CustomerRecord::new(index, fields)
            })
            .collect::<Vec<_>>();

        info!(
            path = %self.path,
            rows = records.len(),
            columns = columns.len(),
            took_ms = start.elapsed().as_millis() as u64,
            "Loaded input table"
        );

        Ok(CsvTable {
            metadata: CsvMetadata { columns },
            records,
        })
    }

    fn read_headers(&self, reader: &mut csv::Reader<File>) -> Result<Vec<String>, FileError> {
        if !self.settings.has_headers {
            return Err(FileError::InvalidFormat(format!(
                "{}: a header row naming the customer fields is required",
                self.path
            )));
        }

        let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(FileError::InvalidFormat(format!(
                "{}: missing header row",
                self.path
            )));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = headers.iter().find(|h| !seen.insert(h.as_str())) {
            return Err(FileError::InvalidFormat(format!(
                "{}: duplicate column '{dup}'",
                self.path
            )));
        }

        Ok(headers)
    }
}
