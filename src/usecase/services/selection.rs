use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::domain::entities::edit::SelectionSet;
use crate::domain::entities::row::Row;

pub fn select_rows(rows: &[Row], unique_key_field: &str, selected_keys: &SelectionSet) -> Vec<Row> {
    rows.iter()
        .filter(|row| {
            row.key(unique_key_field)
                .is_some_and(|key| selected_keys.contains(&key))
        })
        .cloned()
        .collect()
}

/// The snapshot is never patched: it is rebuilt from the latest row
/// collection every time either the keys or the collection change.
#[derive(Debug)]
pub struct SelectionTracker {
    unique_key_field: String,
    selected_keys: SelectionSet,
    snapshot: Rc<RefCell<Vec<Row>>>,
}

impl SelectionTracker {
    pub fn new(unique_key_field: impl Into<String>) -> Self {
        Self {
            unique_key_field: unique_key_field.into(),
            selected_keys: SelectionSet::new(),
            snapshot: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn apply_selection(&mut self, rows: &[Row], selected_keys: SelectionSet) -> Vec<Row> {
        let selected = select_rows(rows, &self.unique_key_field, &selected_keys);
        debug!(
            keys = selected_keys.len(),
            rows = selected.len(),
            "selection applied"
        );
        self.selected_keys = selected_keys;
        *self.snapshot.borrow_mut() = selected.clone();
        selected
    }

    /// Returns whether a recompute ran.
    pub fn rows_replaced(&mut self, rows: &[Row]) -> bool {
        if self.selected_keys.is_empty() {
            return false;
        }
        let selected = select_rows(rows, &self.unique_key_field, &self.selected_keys);
        debug!(
            keys = self.selected_keys.len(),
            rows = selected.len(),
            "selection re-derived"
        );
        *self.snapshot.borrow_mut() = selected;
        true
    }

    pub fn selected_keys(&self) -> &SelectionSet {
        &self.selected_keys
    }

    pub fn current_selection(&self) -> Vec<Row> {
        self.snapshot.borrow().clone()
    }

    pub fn handle(&self) -> SelectionHandle {
        SelectionHandle {
            snapshot: Rc::clone(&self.snapshot),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SelectionHandle {
    snapshot: Rc<RefCell<Vec<Row>>>,
}

impl SelectionHandle {
    pub fn current_selection(&self) -> Vec<Row> {
        self.snapshot.borrow().clone()
    }
}
