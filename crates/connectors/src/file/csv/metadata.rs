use model::core::data_type::ColumnType;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CsvColumnMetadata {
    pub name: String,
    pub data_type: ColumnType,
    pub is_nullable: bool,
    pub ordinal: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CsvMetadata {
    pub columns: Vec<CsvColumnMetadata>,
}

impl CsvMetadata {
    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}

/// Infers column types over every record. A column's type is the smallest
/// one that represents all of its non-empty cells; a column with none is
/// `String`.
pub fn infer_columns(headers: &[String], records: &[csv::StringRecord]) -> Vec<CsvColumnMetadata> {
    let mut inferred: Vec<Option<ColumnType>> = vec![None; headers.len()];
    let mut nullable = vec![false; headers.len()];

    for record in records {
        for (i, field) in record.iter().enumerate().take(headers.len()) {
            if field.is_empty() {
                nullable[i] = true;
            }
            inferred[i] = ColumnType::promote(inferred[i], field);
        }
    }

    headers
        .iter()
        .enumerate()
        .map(|(i, h)| CsvColumnMetadata {
            name: h.clone(),
            data_type: inferred[i].unwrap_or(ColumnType::String),
            is_nullable: nullable[i],
            ordinal: i,
        })
        .collect()
}
