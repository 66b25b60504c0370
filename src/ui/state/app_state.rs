use std::collections::BTreeMap;

use dioxus::prelude::{use_signal, Signal};
use editable_grid::{ColumnDef, GridConfig, Row, RowKey, SelectionSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditingCell {
    pub key: RowKey,
    pub field: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditingRow {
    pub key: RowKey,
    pub inputs: BTreeMap<String, String>,
}

#[derive(Clone, Copy)]
pub struct AppState {
    pub rows: Signal<Vec<Row>>,
    pub columns: Signal<Vec<ColumnDef>>,
    pub checked: Signal<SelectionSet>,
    pub editing_cell: Signal<Option<EditingCell>>,
    pub editing_value: Signal<String>,
    pub editing_row: Signal<Option<EditingRow>>,
    pub page: Signal<usize>,
    pub page_size: Signal<usize>,
    pub status: Signal<String>,
}

impl AppState {
    pub fn new(config: &GridConfig, initial_rows: fn() -> Vec<Row>) -> Self {
        Self {
            rows: use_signal(initial_rows),
            columns: use_signal(|| config.columns.clone()),
            checked: use_signal(SelectionSet::new),
            editing_cell: use_signal(|| None::<EditingCell>),
            editing_value: use_signal(String::new),
            editing_row: use_signal(|| None::<EditingRow>),
            page: use_signal(|| 0_usize),
            page_size: use_signal(|| config.page_size),
            status: use_signal(|| "Ready".to_string()),
        }
    }
}
