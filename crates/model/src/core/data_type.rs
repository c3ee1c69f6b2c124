use crate::core::value::Value;
use serde::Serialize;
use std::fmt;

/// Scalar type of an input column, inferred from its cells.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Float,
    Boolean,
    String,
}

fn parse_bool(cell: &str) -> Option<bool> {
    match cell.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

impl ColumnType {
    /// Narrowest type that represents a single cell. Empty cells carry no type.
    pub fn of(cell: &str) -> Option<ColumnType> {
        if cell.is_empty() {
            None
        } else if cell.parse::<i64>().is_ok() {
            Some(ColumnType::Int)
        } else if cell.parse::<f64>().is_ok_and(f64::is_finite) {
            Some(ColumnType::Float)
        } else if parse_bool(cell).is_some() {
            Some(ColumnType::Boolean)
        } else {
            Some(ColumnType::String)
        }
    }

    /// Smallest type that represents both `self` and `other`.
    ///
    /// `Int` and `Float` meet at `Float`; any other mix meets at `String`, so
    /// the result does not depend on the order cells are seen in.
    pub fn widen(self, other: ColumnType) -> ColumnType {
        match (self, other) {
            (a, b) if a == b => a,
            (ColumnType::Int, ColumnType::Float) | (ColumnType::Float, ColumnType::Int) => {
                ColumnType::Float
            }
            _ => ColumnType::String,
        }
    }

    /// Folds `cell` into the type inferred so far. `None` means no non-empty
    /// cell has been seen yet.
    pub fn promote(current: Option<ColumnType>, cell: &str) -> Option<ColumnType> {
        match (current, ColumnType::of(cell)) {
            (Some(current), Some(cell_type)) => Some(current.widen(cell_type)),
            (current, cell_type) => current.or(cell_type),
        }
    }

    /// Converts a raw cell into a typed value. Empty cells are `Null`.
    pub fn get_value(self, cell: &str) -> Value {
        if cell.is_empty() {
            return Value::Null;
        }

        let parsed = match self {
            ColumnType::Int => cell.parse::<i64>().ok().map(Value::Int),
            ColumnType::Float => cell.parse::<f64>().ok().map(Value::Float),
            ColumnType::Boolean => parse_bool(cell).map(Value::Boolean),
            ColumnType::String => None,
        };

        parsed.unwrap_or_else(|| Value::String(cell.to_string()))
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Int => "int",
            ColumnType::Float => "float",
            ColumnType::Boolean => "boolean",
            ColumnType::String => "string",
        };
        f.write_str(name)
    }
}
