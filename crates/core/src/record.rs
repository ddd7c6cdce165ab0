use crate::cell::CellValue;
use crate::schema::{FieldId, Schema};

/// A row conforming 1:1 to a [`Schema`]: exactly one value per canonical field.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    values: Vec<CellValue>,
}

impl Record {
    /// All fields set to the null sentinel.
    pub fn empty(schema: &Schema) -> Self {
        Self {
            values: vec![CellValue::Empty; schema.len()],
        }
    }

    /// Build a record by resolving each field through `value_of`.
    pub fn from_fn<F>(schema: &Schema, mut value_of: F) -> Self
    where
        F: FnMut(FieldId) -> CellValue,
    {
        Self {
            values: schema.field_ids().map(&mut value_of).collect(),
        }
    }

    pub fn get(&self, id: FieldId) -> &CellValue {
        &self.values[id.index()]
    }

    pub fn values(&self) -> &[CellValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when every canonical field is null.
    pub fn is_all_null(&self) -> bool {
        self.values.iter().all(CellValue::is_null)
    }
}
