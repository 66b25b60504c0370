use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use chrono::NaiveDate;
use dioxus::prelude::*;
use editable_grid::infra::import::csv::import_csv_rows;
use editable_grid::{
    CellEdit, CellValue, ColumnDef, ColumnType, EditableGrid, GridConfig, PageWindow, Row,
    RowKey, SelectionSet,
};
use rfd::FileDialog;
use tracing::{error, info};

use crate::ui::state::app_state::{AppState, EditingCell, EditingRow};

type SharedGrid = Rc<RefCell<EditableGrid>>;

const CELL_STYLE: &str = "border: 1px solid #bbb; padding: 4px;";
const HEADER_CELL_STYLE: &str =
    "border: 1px solid #bbb; padding: 6px; background: #f0f0f0; text-align: left;";
const BUTTON_STYLE: &str = "border: 1px solid #bbb; background: #fff; padding: 4px 10px; border-radius: 6px; cursor: pointer;";

fn sample_rows() -> Vec<Row> {
    let date = |year, month, day| NaiveDate::from_ymd_opt(year, month, day);
    vec![
        Row::new()
            .with("id", 1)
            .with("name", "Ann")
            .with("age", 34)
            .with("date", date(2024, 3, 5)),
        Row::new()
            .with("id", 2)
            .with("name", "Bob")
            .with("age", 27)
            .with("date", date(2023, 11, 20)),
        Row::new()
            .with("id", 3)
            .with("name", "Chen")
            .with("age", 45)
            .with("date", CellValue::Null),
        Row::new()
            .with("id", 4)
            .with("name", "Dana")
            .with("age", 19)
            .with("date", date(2024, 1, 9)),
        Row::new()
            .with("id", 5)
            .with("name", "Emil")
            .with("age", 52)
            .with("date", date(2022, 6, 30)),
        Row::new()
            .with("id", 6)
            .with("name", "Fay")
            .with("age", 38)
            .with("date", date(2024, 8, 14)),
    ]
}

fn build_grid(config: GridConfig, state: AppState) -> Result<SharedGrid, String> {
    let AppState {
        mut rows,
        mut checked,
        ..
    } = state;
    let grid = EditableGrid::new(config)
        .map_err(|err| {
            error!(%err, "invalid grid configuration");
            err.to_string()
        })?
        .with_row_sink(move |next: Vec<Row>| rows.set(next))
        .with_selection_sink(move |keys: &SelectionSet| checked.set(keys.clone()));
    Ok(Rc::new(RefCell::new(grid)))
}

/// Columns for an imported file: configured columns are kept for fields the
/// file shares with them, anything else is shown as text.
fn columns_for_fields(configured: &[ColumnDef], fields: &[String], unique: &str) -> Vec<ColumnDef> {
    fields
        .iter()
        .filter(|field| field.as_str() != unique)
        .map(|field| {
            configured
                .iter()
                .find(|column| &column.field == field)
                .cloned()
                .unwrap_or_else(|| ColumnDef::new(field.as_str(), field.as_str(), ColumnType::String))
        })
        .collect()
}

fn key_label(keys: impl Iterator<Item = Option<RowKey>>) -> String {
    keys.flatten()
        .map(|key| key.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn commit_cell(grid: &SharedGrid, mut state: AppState, key: RowKey, column: &ColumnDef) {
    let value = column.parse_input(&(state.editing_value)());
    let current = (state.rows)();
    grid.borrow_mut().on_cell_edit_commit(
        &current,
        CellEdit {
            key,
            field: column.field.clone(),
            value,
        },
    );
    state.editing_cell.set(None);
    state.editing_value.set(String::new());
}

fn start_row_edit(mut state: AppState, row: &Row, key: RowKey, columns: &[ColumnDef]) {
    let inputs: BTreeMap<String, String> = columns
        .iter()
        .filter(|column| column.editable)
        .map(|column| (column.field.clone(), column.editor_text(row.value(&column.field))))
        .collect();
    state.editing_cell.set(None);
    state.editing_row.set(Some(EditingRow { key, inputs }));
}

fn save_row(grid: &SharedGrid, mut state: AppState, columns: &[ColumnDef], unique: &str) {
    let Some(draft) = (state.editing_row)() else {
        return;
    };
    let current = (state.rows)();
    let Some(original) = current
        .iter()
        .find(|row| row.key(unique).as_ref() == Some(&draft.key))
    else {
        state.editing_row.set(None);
        state.status.set(format!("Row {} no longer exists", draft.key));
        return;
    };

    let mut next = original.clone();
    for column in columns.iter().filter(|column| column.editable) {
        if let Some(text) = draft.inputs.get(&column.field) {
            next.set(column.field.as_str(), column.parse_input(text));
        }
    }

    let saved = grid.borrow_mut().on_row_update(&current, next);
    state.editing_row.set(None);
    state.status.set(format!(
        "Saved row {}",
        key_label(std::iter::once(saved.key(unique)))
    ));
}

fn render_cell(
    grid: SharedGrid,
    mut state: AppState,
    row: &Row,
    key: Option<RowKey>,
    column: ColumnDef,
) -> Element {
    let value = row.value(&column.field).clone();
    let style = format!(
        "{CELL_STYLE} text-align: {}; width: {}px;",
        column.alignment(),
        column.width
    );
    let input_type = column.input_type();

    let draft = (state.editing_row)().filter(|draft| Some(&draft.key) == key.as_ref());
    if let (Some(draft), true) = (draft, column.editable) {
        let text = draft.inputs.get(&column.field).cloned().unwrap_or_default();
        let field = column.field.clone();
        return rsx! {
            td { style: "{style}",
                input {
                    r#type: input_type,
                    value: "{text}",
                    oninput: move |event| {
                        if let Some(draft) = &mut *state.editing_row.write() {
                            draft.inputs.insert(field.clone(), event.value());
                        }
                    }
                }
            }
        };
    }

    let is_editing = match (&key, (state.editing_cell)()) {
        (Some(key), Some(cell)) => &cell.key == key && cell.field == column.field,
        _ => false,
    };

    if let (true, Some(key)) = (is_editing, key.clone()) {
        return rsx! {
            td { style: "{style}",
                input {
                    r#type: input_type,
                    autofocus: true,
                    value: (state.editing_value)(),
                    oninput: move |event| {
                        state.editing_value.set(event.value());
                    },
                    onkeydown: move |event| {
                        if event.key() == Key::Enter {
                            commit_cell(&grid, state, key.clone(), &column);
                        } else if event.key() == Key::Escape {
                            state.editing_cell.set(None);
                            state.editing_value.set(String::new());
                        }
                    }
                }
            }
        };
    }

    let formatted = column.format_value(&value);
    rsx! {
        td {
            style: "{style}",
            ondoubleclick: move |_| {
                let Some(key) = key.clone() else {
                    return;
                };
                if !column.editable || (state.editing_row)().is_some() {
                    return;
                }
                state.editing_cell.set(Some(EditingCell {
                    key,
                    field: column.field.clone(),
                }));
                state.editing_value.set(column.editor_text(&value));
            },
            "{formatted}"
        }
    }
}

#[component]
pub fn App() -> Element {
    let config = use_hook(GridConfig::default);
    let mut state = AppState::new(&config, sample_rows);
    let grid = use_hook(|| build_grid(config.clone(), state));

    let grid = match grid {
        Ok(grid) => grid,
        Err(err) => {
            return rsx! {
                div {
                    p { "Invalid grid configuration: {err}" }
                }
            };
        }
    };

    let unique = config.unique_key_field.clone();
    let page_size_options = config.page_size_options.clone();
    let handle = grid.borrow().selection_handle();

    let all_rows = (state.rows)();
    let columns = (state.columns)();
    let checked_snapshot = (state.checked)();
    let editing_row_snapshot = (state.editing_row)();
    let window = PageWindow::new(all_rows.len(), (state.page)(), (state.page_size)());
    let visible_rows = all_rows[window.range()].to_vec();
    let all_keys: SelectionSet = all_rows.iter().filter_map(|row| row.key(&unique)).collect();
    let all_selected = !all_keys.is_empty() && all_keys.is_subset(&checked_snapshot);
    let page_label = format!("Page {} / {}", window.page + 1, window.page_count());
    let selected_count = checked_snapshot.len();
    let current_page_size = window.page_size;

    let grid_for_import = grid.clone();
    let unique_for_import = unique.clone();
    let unique_for_label = unique.clone();
    let grid_for_all = grid.clone();
    let status_text = (state.status)();
    let column_span = columns.len() + 2;

    rsx! {
        div { style: "font-family: sans-serif; padding: 12px;",
            nav {
                style: "display: flex; gap: 12px; align-items: center; flex-wrap: wrap; padding: 8px 0;",
                button {
                    style: BUTTON_STYLE,
                    onclick: move |_| {
                        let Some(file_path) = FileDialog::new()
                            .add_filter("CSV", &["csv"])
                            .pick_file() else {
                            state.status.set("Import cancelled".to_string());
                            return;
                        };

                        match import_csv_rows(&file_path, &unique_for_import) {
                            Ok(imported) => {
                                let next_columns = columns_for_fields(
                                    &(state.columns)(),
                                    &imported.fields,
                                    &unique_for_import,
                                );
                                let count = imported.rows.len();
                                state.rows.set(imported.rows.clone());
                                grid_for_import.borrow_mut().rows_replaced(&imported.rows);
                                state.columns.set(next_columns);
                                state.editing_cell.set(None);
                                state.editing_row.set(None);
                                state.page.set(0);
                                state.status.set(format!("Imported {count} rows from {}", file_path.display()));
                            }
                            Err(err) => {
                                error!("csv import failed: {err:#}");
                                state.status.set(format!("Import failed: {err:#}"));
                            }
                        }
                    },
                    "Import CSV"
                }
                button {
                    style: BUTTON_STYLE,
                    disabled: selected_count == 0,
                    onclick: move |_| {
                        let selection = handle.current_selection();
                        let keys = key_label(selection.iter().map(|row| row.key(&unique_for_label)));
                        info!(rows = selection.len(), "bulk action on selection");
                        state.status.set(format!("{} selected: {keys}", selection.len()));
                    },
                    "Show selected ({selected_count})"
                }
                span { "{status_text}" }
            }

            table { style: "border-collapse: collapse; width: 100%; background: #fff;",
                thead {
                    tr {
                        th { style: HEADER_CELL_STYLE,
                            input {
                                r#type: "checkbox",
                                checked: all_selected,
                                onclick: move |_| {
                                    let current = (state.rows)();
                                    let next = if all_selected {
                                        SelectionSet::new()
                                    } else {
                                        all_keys.clone()
                                    };
                                    grid_for_all.borrow_mut().on_selection_change(&current, next);
                                }
                            }
                        }
                        for column in columns.iter() {
                            th { style: "{HEADER_CELL_STYLE} width: {column.width}px;", "{column.header_name}" }
                        }
                        th { style: HEADER_CELL_STYLE, "" }
                    }
                }
                tbody {
                    if visible_rows.is_empty() {
                        tr {
                            td {
                                colspan: "{column_span}",
                                style: "padding: 48px; text-align: center; color: #888;",
                                "No rows"
                            }
                        }
                    }
                    {visible_rows.iter().map(|row| {
                        let key = row.key(&unique);
                        let is_checked = key.as_ref().is_some_and(|key| checked_snapshot.contains(key));
                        let in_row_edit = key.is_some()
                            && editing_row_snapshot.as_ref().map(|draft| &draft.key) == key.as_ref();
                        let row_style = if is_checked { "background: #eef4ff;" } else { "" };
                        let grid_for_toggle = grid.clone();
                        let grid_for_save = grid.clone();
                        let key_for_toggle = key.clone();
                        let key_for_edit = key.clone();
                        let row_for_edit = row.clone();
                        let columns_for_edit = columns.clone();
                        let columns_for_save = columns.clone();
                        let unique_for_save = unique.clone();
                        rsx!(
                            tr { style: "{row_style}",
                                td { style: "{CELL_STYLE} text-align: center;",
                                    input {
                                        r#type: "checkbox",
                                        checked: is_checked,
                                        disabled: key.is_none(),
                                        onclick: move |_| {
                                            let Some(key) = key_for_toggle.clone() else {
                                                return;
                                            };
                                            let mut next = (state.checked)();
                                            if !next.remove(&key) {
                                                next.insert(key);
                                            }
                                            let current = (state.rows)();
                                            grid_for_toggle.borrow_mut().on_selection_change(&current, next);
                                        }
                                    }
                                }
                                {columns.iter().map(|column| {
                                    render_cell(grid.clone(), state, row, key.clone(), column.clone())
                                })}
                                td { style: "{CELL_STYLE} white-space: nowrap;",
                                    if in_row_edit {
                                        button {
                                            style: BUTTON_STYLE,
                                            onclick: move |_| save_row(&grid_for_save, state, &columns_for_save, &unique_for_save),
                                            "Save"
                                        }
                                        button {
                                            style: BUTTON_STYLE,
                                            onclick: move |_| state.editing_row.set(None),
                                            "Cancel"
                                        }
                                    } else {
                                        button {
                                            style: BUTTON_STYLE,
                                            disabled: key.is_none() || editing_row_snapshot.is_some(),
                                            onclick: move |_| {
                                                if let Some(key) = key_for_edit.clone() {
                                                    start_row_edit(state, &row_for_edit, key, &columns_for_edit);
                                                }
                                            },
                                            "Edit row"
                                        }
                                    }
                                }
                            }
                        )
                    })}
                }
            }

            div {
                style: "display: flex; gap: 12px; align-items: center; justify-content: flex-end; padding: 8px 0;",
                span { "Rows per page" }
                select {
                    value: "{current_page_size}",
                    onchange: move |event| {
                        if let Ok(size) = event.value().parse::<usize>() {
                            state.page_size.set(size);
                            state.page.set(0);
                        }
                    },
                    for size in page_size_options.iter() {
                        option { value: "{size}", selected: *size == current_page_size, "{size}" }
                    }
                }
                button {
                    style: BUTTON_STYLE,
                    disabled: !window.has_prev(),
                    onclick: move |_| state.page.set(window.page.saturating_sub(1)),
                    "Prev"
                }
                span { "{page_label}" }
                button {
                    style: BUTTON_STYLE,
                    disabled: !window.has_next(),
                    onclick: move |_| state.page.set(window.page + 1),
                    "Next"
                }
            }
        }
    }
}
