use tracing::{debug, warn};

use crate::domain::datetime::canonical_date;
use crate::domain::entities::edit::CellEdit;
use crate::domain::entities::row::{CellValue, Row};

pub const DEFAULT_UNIQUE_KEY_FIELD: &str = "id";
pub const DEFAULT_DATE_FIELD: &str = "date";

/// Every output is a freshly built collection of the same length and order as
/// the input; only rows whose identity key equals the edit's key differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowReconciler {
    unique_key_field: String,
    date_field: String,
}

impl Default for RowReconciler {
    fn default() -> Self {
        Self::new(DEFAULT_UNIQUE_KEY_FIELD)
    }
}

impl RowReconciler {
    pub fn new(unique_key_field: impl Into<String>) -> Self {
        Self {
            unique_key_field: unique_key_field.into(),
            date_field: DEFAULT_DATE_FIELD.to_string(),
        }
    }

    pub fn with_date_field(mut self, date_field: impl Into<String>) -> Self {
        self.date_field = date_field.into();
        self
    }

    pub fn unique_key_field(&self) -> &str {
        &self.unique_key_field
    }

    pub fn date_field(&self) -> &str {
        &self.date_field
    }

    /// Date-field values are stored as `YYYY/MM/DD` text.
    pub fn commit_field_edit(&self, rows: &[Row], edit: &CellEdit) -> Vec<Row> {
        let value = self.stored_value(&edit.field, &edit.value);
        let mut matched = 0_usize;
        let changes: Vec<Row> = rows
            .iter()
            .map(|row| {
                let mut next = row.clone();
                if row.key(&self.unique_key_field).as_ref() == Some(&edit.key) {
                    next.set(edit.field.as_str(), value.clone());
                    matched += 1;
                }
                next
            })
            .collect();

        debug!(
            key = %edit.key,
            field = %edit.field,
            matched,
            rows = changes.len(),
            "committed cell edit"
        );
        changes
    }

    pub fn commit_whole_row(&self, rows: &[Row], new_row: Row) -> (Vec<Row>, Row) {
        let key = new_row.key(&self.unique_key_field);
        let mut matched = 0_usize;
        let changes: Vec<Row> = rows
            .iter()
            .map(|row| {
                if key.is_some() && row.key(&self.unique_key_field) == key {
                    matched += 1;
                    new_row.clone()
                } else {
                    row.clone()
                }
            })
            .collect();

        match &key {
            Some(key) => debug!(%key, matched, rows = changes.len(), "committed row update"),
            None => warn!(
                field = %self.unique_key_field,
                "row update carries no identity key; collection left unchanged"
            ),
        }
        (changes, new_row)
    }

    fn stored_value(&self, field: &str, raw: &CellValue) -> CellValue {
        if field != self.date_field || raw.is_null() {
            return raw.clone();
        }
        match canonical_date(raw) {
            Some(text) => CellValue::Text(text),
            None => {
                warn!(field, value = %raw, "date edit is not a recognizable date; stored as given");
                raw.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::entities::row::RowKey;

    fn people() -> Vec<Row> {
        vec![
            Row::new().with("id", 1).with("name", "A").with("age", 10),
            Row::new().with("id", 2).with("name", "B").with("age", 20),
            Row::new().with("id", 3).with("name", "C").with("age", 30),
        ]
    }

    fn keys(rows: &[Row]) -> Vec<Option<RowKey>> {
        rows.iter().map(|row| row.key("id")).collect()
    }

    #[test]
    fn field_edit_touches_only_the_matched_row() {
        let rows = people();
        let reconciler = RowReconciler::default();

        let changes = reconciler.commit_field_edit(&rows, &CellEdit::new(2, "name", "Bea"));

        assert_eq!(changes.len(), rows.len(), "length must be preserved");
        assert_eq!(keys(&changes), keys(&rows), "order must be preserved");
        assert_eq!(changes[0], rows[0]);
        assert_eq!(changes[2], rows[2]);
        assert_eq!(changes[1].value("name"), &CellValue::from("Bea"));
        assert_eq!(changes[1].value("age"), &CellValue::Int(20), "other fields survive");
    }

    #[test]
    fn field_edit_can_add_a_field_the_row_lacked() {
        let rows = people();
        let changes =
            RowReconciler::default().commit_field_edit(&rows, &CellEdit::new(3, "city", "Oslo"));
        assert_eq!(changes[2].value("city"), &CellValue::from("Oslo"));
    }

    #[test]
    fn unknown_key_leaves_collection_unchanged() {
        let rows = people();
        let changes =
            RowReconciler::default().commit_field_edit(&rows, &CellEdit::new(99, "age", 1));
        assert_eq!(changes, rows);
    }

    #[test]
    fn huge_float_keys_are_not_matched_as_int_max() {
        let rows = vec![
            Row::new().with("id", 1e19).with("name", "A"),
            Row::new().with("id", 2e19).with("name", "B"),
        ];
        let edit = CellEdit::new(i64::MAX, "name", "Z");
        let changes = RowReconciler::default().commit_field_edit(&rows, &edit);
        assert_eq!(changes, rows);
    }

    #[test]
    fn empty_collection_stays_empty() {
        let changes = RowReconciler::default().commit_field_edit(&[], &CellEdit::new(1, "age", 1));
        assert!(changes.is_empty());
    }

    #[test]
    fn date_edit_is_stored_as_year_month_day() {
        let rows = vec![Row::new().with("id", 1).with("date", "2020/01/01")];
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).expect("valid date");

        let changes = RowReconciler::default().commit_field_edit(&rows, &CellEdit::new(1, "date", date));

        assert_eq!(changes[0].value("date"), &CellValue::from("2024/03/05"));
    }

    #[test]
    fn date_edit_accepts_datetime_and_text() {
        let rows = vec![Row::new().with("id", 1)];
        let reconciler = RowReconciler::default();
        let datetime = NaiveDate::from_ymd_opt(2024, 3, 5)
            .and_then(|date| date.and_hms_opt(23, 59, 0))
            .expect("valid datetime");

        let from_datetime = reconciler.commit_field_edit(&rows, &CellEdit::new(1, "date", datetime));
        let from_text = reconciler.commit_field_edit(&rows, &CellEdit::new(1, "date", "2024-03-05"));

        assert_eq!(from_datetime[0].value("date"), &CellValue::from("2024/03/05"));
        assert_eq!(from_text[0].value("date"), &CellValue::from("2024/03/05"));
    }

    #[test]
    fn cleared_or_unparsable_date_is_stored_as_given() {
        let rows = vec![Row::new().with("id", 1).with("date", "2020/01/01")];
        let reconciler = RowReconciler::default();

        let cleared = reconciler.commit_field_edit(&rows, &CellEdit::new(1, "date", CellValue::Null));
        let garbage = reconciler.commit_field_edit(&rows, &CellEdit::new(1, "date", "soon"));

        assert_eq!(cleared[0].value("date"), &CellValue::Null);
        assert_eq!(garbage[0].value("date"), &CellValue::from("soon"));
    }

    #[test]
    fn date_canonicalization_follows_configured_field() {
        let rows = vec![Row::new().with("id", 1)];
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).expect("valid date");
        let reconciler = RowReconciler::default().with_date_field("due");

        let due = reconciler.commit_field_edit(&rows, &CellEdit::new(1, "due", date));
        let plain = reconciler.commit_field_edit(&rows, &CellEdit::new(1, "date", date));

        assert_eq!(due[0].value("due"), &CellValue::from("2024/03/05"));
        assert_eq!(plain[0].value("date"), &CellValue::Date(date), "only the date field is rewritten");
    }

    #[test]
    fn custom_unique_key_field_is_honored() {
        let rows = vec![
            Row::new().with("sku", "X1").with("qty", 1),
            Row::new().with("sku", "X2").with("qty", 2),
        ];
        let changes = RowReconciler::new("sku").commit_field_edit(&rows, &CellEdit::new("X2", "qty", 5));
        assert_eq!(changes[0].value("qty"), &CellValue::Int(1));
        assert_eq!(changes[1].value("qty"), &CellValue::Int(5));
    }

    #[test]
    fn whole_row_replacement_is_verbatim() {
        let rows = people();
        let replacement = Row::new().with("id", 2).with("name", "Bo").with("date", "not a date");

        let (changes, returned) = RowReconciler::default().commit_whole_row(&rows, replacement.clone());

        assert_eq!(returned, replacement);
        assert_eq!(changes[1], replacement, "no per-field transform on whole-row path");
        assert_eq!(changes[1].get("age"), None, "fields missing from the new row are dropped");
        assert_eq!(changes[0], rows[0]);
        assert_eq!(changes[2], rows[2]);
    }

    #[test]
    fn whole_row_without_key_matches_nothing() {
        let rows = vec![Row::new().with("name", "keyless"), Row::new().with("id", 1)];
        let replacement = Row::new().with("name", "other");

        let (changes, _) = RowReconciler::default().commit_whole_row(&rows, replacement);

        assert_eq!(changes, rows);
    }
}
