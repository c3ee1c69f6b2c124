use serde::{Deserialize, Serialize};

/// Request body of `POST /predict`: `{"customer": {<field>: <value>, ...}}`.
///
/// Field order follows the input columns.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RequestPayload {
    pub customer: serde_json::Map<String, serde_json::Value>,
}

/// Body of a 200 answer.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PredictionResponse {
    pub churn_probability: f64,
    pub churn_prediction: String,
}

/// Optional body of a non-200 answer.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
}
