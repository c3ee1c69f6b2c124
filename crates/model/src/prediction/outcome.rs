use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Binary churn label returned by the prediction endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChurnLabel {
    Yes,
    No,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown churn label '{0}', expected 'Yes' or 'No'")]
pub struct InvalidLabel(pub String);

impl FromStr for ChurnLabel {
    type Err = InvalidLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Yes" => Ok(ChurnLabel::Yes),
            "No" => Ok(ChurnLabel::No),
            other => Err(InvalidLabel(other.to_string())),
        }
    }
}

impl fmt::Display for ChurnLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChurnLabel::Yes => f.write_str("Yes"),
            ChurnLabel::No => f.write_str("No"),
        }
    }
}

/// Classification of a failed prediction.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The endpoint answered with a non-200 status.
    HttpError,
    /// The request never got an answer: refused, DNS, timeout.
    NetworkError,
    /// The endpoint answered 200 but the body was not a prediction.
    Unknown,
}

impl ErrorKind {
    /// Stable code used in logs.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::HttpError => "HTTP_ERROR",
            ErrorKind::NetworkError => "REQUEST_ERROR",
            ErrorKind::Unknown => "UNKNOWN_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Result of scoring one record. Produced once per record.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PredictionOutcome {
    Success {
        probability: f64,
        label: ChurnLabel,
    },
    Failure {
        error_message: String,
        error_kind: ErrorKind,
    },
}

impl PredictionOutcome {
    pub fn success(probability: f64, label: ChurnLabel) -> Self {
        PredictionOutcome::Success { probability, label }
    }

    pub fn failure(error_kind: ErrorKind, error_message: impl Into<String>) -> Self {
        PredictionOutcome::Failure {
            error_message: error_message.into(),
            error_kind,
        }
    }

    pub fn probability(&self) -> Option<f64> {
        match self {
            PredictionOutcome::Success { probability, .. } => Some(*probability),
            PredictionOutcome::Failure { .. } => None,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            PredictionOutcome::Success { .. } => None,
            PredictionOutcome::Failure { error_kind, .. } => Some(*error_kind),
        }
    }
}
