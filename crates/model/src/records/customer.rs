use crate::core::value::FieldValue;
use serde::Serialize;

/// One input row: its 0-based position in the input table plus its cells in
/// header order.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CustomerRecord {
    pub index: usize,
    pub fields: Vec<FieldValue>,
}

impl CustomerRecord {
    pub fn new(index: usize, fields: Vec<FieldValue>) -> Self {
        CustomerRecord { index, fields }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.name == field)
    }
}
