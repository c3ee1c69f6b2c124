use crate::{
    core::value::{FieldValue, Value},
    prediction::outcome::{ChurnLabel, PredictionOutcome},
    records::customer::CustomerRecord,
};
use serde::Serialize;
use std::fmt;

pub const CHURN_PROBABILITY: &str = "churn_probability";
pub const CHURN_PREDICTION: &str = "churn_prediction";
pub const PREDICTION_STATUS: &str = "prediction_status";
pub const ERROR_MESSAGE: &str = "error_message";

/// Columns appended to every output row, in output order.
pub const PREDICTION_COLUMNS: [&str; 4] = [
    CHURN_PROBABILITY,
    CHURN_PREDICTION,
    PREDICTION_STATUS,
    ERROR_MESSAGE,
];

pub fn is_prediction_column(name: &str) -> bool {
    PREDICTION_COLUMNS.contains(&name)
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    Success,
    Failed,
}

impl PredictionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionStatus::Success => "success",
            PredictionStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for PredictionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four prediction columns of an output row.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PredictionColumns {
    pub churn_probability: Option<f64>,
    pub churn_prediction: Option<ChurnLabel>,
    pub prediction_status: PredictionStatus,
    pub error_message: Option<String>,
}

impl From<&PredictionOutcome> for PredictionColumns {
    fn from(outcome: &PredictionOutcome) -> Self {
        match outcome {
            PredictionOutcome::Success { probability, label } => PredictionColumns {
                churn_probability: Some(*probability),
                churn_prediction: Some(*label),
                prediction_status: PredictionStatus::Success,
                error_message: None,
            },
            PredictionOutcome::Failure { error_message, .. } => PredictionColumns {
                churn_probability: None,
                churn_prediction: None,
                prediction_status: PredictionStatus::Failed,
                error_message: Some(error_message.clone()),
            },
        }
    }
}

impl PredictionColumns {
    /// Cells in [`PREDICTION_COLUMNS`] order.
    pub fn cells(&self) -> [Value; 4] {
        [
            self.churn_probability.map(Value::Float).unwrap_or(Value::Null),
            self.churn_prediction
                .map(|label| Value::String(label.to_string()))
                .unwrap_or(Value::Null),
            Value::String(self.prediction_status.to_string()),
            self.error_message
                .clone()
                .map(Value::String)
                .unwrap_or(Value::Null),
        ]
    }
}

/// An input record together with its prediction columns.
///
/// Input columns that collide with a prediction column name are superseded
/// by the prediction column on output.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoredRecord {
    pub record: CustomerRecord,
    pub prediction: PredictionColumns,
}

impl ScoredRecord {
    pub fn new(record: CustomerRecord, outcome: &PredictionOutcome) -> Self {
        ScoredRecord {
            record,
            prediction: PredictionColumns::from(outcome),
        }
    }

    pub fn index(&self) -> usize {
        self.record.index
    }

    /// Input fields that are carried through unchanged.
    pub fn passthrough(&self) -> impl Iterator<Item = &FieldValue> {
        self.record
            .fields
            .iter()
            .filter(|f| !is_prediction_column(&f.name))
    }
}
