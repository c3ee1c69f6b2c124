use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar cell value.
///
/// Serializes untagged, so a `Value::Int(3)` becomes the JSON number `3` and
/// `Value::Null` becomes `null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Boolean(bool),
    String(String),
    Null,
}

impl Value {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Int(v) => serde_json::Value::from(*v),
            Value::Float(v) => serde_json::Value::from(*v),
            Value::Boolean(v) => serde_json::Value::Bool(*v),
            Value::String(v) => serde_json::Value::String(v.clone()),
            Value::Null => serde_json::Value::Null,
        }
    }
}

/// Renders the value as a CSV cell; `Null` renders as an empty cell.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::String(v) => f.write_str(v),
            Value::Null => Ok(()),
        }
    }
}

/// A named cell of a record. `raw` keeps the cell text exactly as read so the
/// output table reproduces input columns verbatim.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldValue {
    pub name: String,
    pub value: Value,
    #[serde(skip)]
    pub raw: String,
}

impl FieldValue {
    pub fn new(name: impl Into<String>, value: Value, raw: impl Into<String>) -> Self {
        FieldValue {
            name: name.into(),
            value,
            raw: raw.into(),
        }
    }
}
