use tracing::warn;

use crate::config::{ConfigError, GridConfig};
use crate::domain::entities::column::ColumnDef;
use crate::domain::entities::edit::{CellEdit, SelectionSet};
use crate::domain::entities::row::{Row, RowKey};
use crate::usecase::ports::sink::{NoopSink, RowSink, SelectionSink};
use crate::usecase::services::reconcile::RowReconciler;
use crate::usecase::services::selection::{SelectionHandle, SelectionTracker};

pub struct EditableGrid {
    config: GridConfig,
    reconciler: RowReconciler,
    tracker: SelectionTracker,
    row_sink: Box<dyn RowSink>,
    selection_sink: Box<dyn SelectionSink>,
}

impl EditableGrid {
    pub fn new(config: GridConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let reconciler = RowReconciler::new(config.unique_key_field.as_str())
            .with_date_field(config.date_field.as_str());
        let tracker = SelectionTracker::new(config.unique_key_field.as_str());
        Ok(Self {
            config,
            reconciler,
            tracker,
            row_sink: Box::new(NoopSink),
            selection_sink: Box::new(NoopSink),
        })
    }

    pub fn with_row_sink(mut self, sink: impl RowSink + 'static) -> Self {
        self.row_sink = Box::new(sink);
        self
    }

    pub fn with_selection_sink(mut self, sink: impl SelectionSink + 'static) -> Self {
        self.selection_sink = Box::new(sink);
        self
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.config.columns
    }

    pub fn row_id(&self, row: &Row) -> Option<RowKey> {
        row.key(&self.config.unique_key_field)
    }

    pub fn on_cell_edit_commit(&mut self, rows: &[Row], edit: CellEdit) -> Vec<Row> {
        if !rows.iter().any(|row| self.row_id(row).as_ref() == Some(&edit.key)) {
            warn!(key = %edit.key, field = %edit.field, "cell edit addresses no row");
        }
        let changes = self.reconciler.commit_field_edit(rows, &edit);
        self.publish_rows(&changes);
        changes
    }

    pub fn on_row_update(&mut self, rows: &[Row], new_row: Row) -> Row {
        let (changes, new_row) = self.reconciler.commit_whole_row(rows, new_row);
        self.publish_rows(&changes);
        new_row
    }

    pub fn on_selection_change(&mut self, rows: &[Row], selected_keys: SelectionSet) -> Vec<Row> {
        let selected = self.tracker.apply_selection(rows, selected_keys);
        self.selection_sink.set_checked(self.tracker.selected_keys());
        selected
    }

    /// Adopts keys the owner changed on its own (controlled selection),
    /// without echoing them back through the selection sink.
    pub fn sync_checked(&mut self, rows: &[Row], selected_keys: SelectionSet) {
        if &selected_keys != self.tracker.selected_keys() {
            self.tracker.apply_selection(rows, selected_keys);
        }
    }

    pub fn rows_replaced(&mut self, rows: &[Row]) -> bool {
        self.tracker.rows_replaced(rows)
    }

    pub fn selected_keys(&self) -> &SelectionSet {
        self.tracker.selected_keys()
    }

    pub fn current_selection(&self) -> Vec<Row> {
        self.tracker.current_selection()
    }

    pub fn selection_handle(&self) -> SelectionHandle {
        self.tracker.handle()
    }

    fn publish_rows(&mut self, changes: &[Row]) {
        self.row_sink.set_rows(changes.to_vec());
        self.tracker.rows_replaced(changes);
    }
}
