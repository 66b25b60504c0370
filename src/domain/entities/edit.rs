use std::collections::BTreeSet;

use crate::domain::entities::row::{CellValue, RowKey};

#[derive(Debug, Clone, PartialEq)]
pub struct CellEdit {
    pub key: RowKey,
    pub field: String,
    pub value: CellValue,
}

impl CellEdit {
    pub fn new(
        key: impl Into<RowKey>,
        field: impl Into<String>,
        value: impl Into<CellValue>,
    ) -> Self {
        Self {
            key: key.into(),
            field: field.into(),
            value: value.into(),
        }
    }
}

pub type SelectionSet = BTreeSet<RowKey>;
