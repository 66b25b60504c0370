use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Integral floats address the same row as the equal integer. Floats
    /// outside the `i64` range address no row.
    pub fn as_key(&self) -> Option<RowKey> {
        match self {
            CellValue::Int(value) => Some(RowKey::Int(*value)),
            CellValue::Float(value)
                if value.fract() == 0.0
                    && *value >= i64::MIN as f64
                    && *value < i64::MAX as f64 =>
            {
                Some(RowKey::Int(*value as i64))
            }
            CellValue::Text(value) => Some(RowKey::Text(value.clone())),
            _ => None,
        }
    }
}

fn format_f64(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    if value.fract().abs() < f64::EPSILON {
        format!("{}", value as i64)
    } else {
        let mut text = format!("{value:.6}");
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
        text
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(value) => write!(f, "{value}"),
            CellValue::Int(value) => write!(f, "{value}"),
            CellValue::Float(value) => f.write_str(&format_f64(*value)),
            CellValue::Text(value) => f.write_str(value),
            CellValue::Date(value) => write!(f, "{}", value.format("%Y-%m-%d")),
            CellValue::DateTime(value) => write!(f, "{}", value.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Int(i64::from(value))
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        CellValue::Date(value)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(value: NaiveDateTime) -> Self {
        CellValue::DateTime(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Null, Into::into)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RowKey {
    Int(i64),
    Text(String),
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Int(value) => write!(f, "{value}"),
            RowKey::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for RowKey {
    fn from(value: i64) -> Self {
        RowKey::Int(value)
    }
}

impl From<i32> for RowKey {
    fn from(value: i32) -> Self {
        RowKey::Int(i64::from(value))
    }
}

impl From<&str> for RowKey {
    fn from(value: &str) -> Self {
        RowKey::Text(value.to_string())
    }
}

impl From<String> for RowKey {
    fn from(value: String) -> Self {
        RowKey::Text(value)
    }
}

impl From<RowKey> for CellValue {
    fn from(value: RowKey) -> Self {
        match value {
            RowKey::Int(value) => CellValue::Int(value),
            RowKey::Text(value) => CellValue::Text(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    fields: BTreeMap<String, CellValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&CellValue> {
        self.fields.get(field)
    }

    pub fn value(&self, field: &str) -> &CellValue {
        const NULL: &CellValue = &CellValue::Null;
        self.fields.get(field).unwrap_or(NULL)
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<CellValue>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn key(&self, unique_key_field: &str) -> Option<RowKey> {
        self.fields.get(unique_key_field).and_then(CellValue::as_key)
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(field, value)| (field.into(), value.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_reads_int_and_text_but_not_other_values() {
        let row = Row::new().with("id", 7).with("code", "A-1").with("flag", true);

        assert_eq!(row.key("id"), Some(RowKey::Int(7)));
        assert_eq!(row.key("code"), Some(RowKey::Text("A-1".to_string())));
        assert_eq!(row.key("flag"), None, "booleans never address a row");
        assert_eq!(row.key("missing"), None);
    }

    #[test]
    fn integral_float_key_matches_int_key() {
        let row = Row::new().with("id", 3.0);
        assert_eq!(row.key("id"), Some(RowKey::Int(3)));

        let fractional = Row::new().with("id", 3.5);
        assert_eq!(fractional.key("id"), None);
    }

    #[test]
    fn out_of_range_float_keys_stay_distinct_from_int_max() {
        let rows = [Row::new().with("id", 1e19), Row::new().with("id", 2e19)];
        assert_eq!(rows[0].key("id"), None);
        assert_eq!(rows[1].key("id"), None);

        let edge = Row::new().with("id", -9_223_372_036_854_775_808.0);
        assert_eq!(edge.key("id"), Some(RowKey::Int(i64::MIN)));
        assert_eq!(Row::new().with("id", 9_223_372_036_854_775_807.0).key("id"), None);
    }

    #[test]
    fn display_trims_float_zeros_and_blanks_null() {
        assert_eq!(CellValue::Float(12.5).to_string(), "12.5");
        assert_eq!(CellValue::Float(20.0).to_string(), "20");
        assert_eq!(CellValue::Null.to_string(), "");
    }
}
