use crate::domain::datetime::{
    display_date, display_datetime, parse_date_text, parse_datetime_text, value_date,
};
use crate::domain::entities::row::CellValue;

pub const DEFAULT_COLUMN_WIDTH: u32 = 160;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    String,
    Number,
    Date,
    DateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub header_name: String,
    pub field: String,
    pub width: u32,
    pub kind: ColumnType,
    pub editable: bool,
}

impl ColumnDef {
    pub fn new(field: impl Into<String>, header_name: impl Into<String>, kind: ColumnType) -> Self {
        Self {
            header_name: header_name.into(),
            field: field.into(),
            width: DEFAULT_COLUMN_WIDTH,
            kind,
            editable: true,
        }
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.editable = false;
        self
    }

    pub fn alignment(&self) -> &'static str {
        match self.kind {
            ColumnType::Number => "right",
            _ => "left",
        }
    }

    pub fn format_value(&self, value: &CellValue) -> String {
        match (self.kind, value) {
            (_, CellValue::Null) => String::new(),
            (ColumnType::Date, value) => display_date(value).unwrap_or_else(|| value.to_string()),
            (ColumnType::DateTime, value) => {
                display_datetime(value).unwrap_or_else(|| value.to_string())
            }
            (_, value) => value.to_string(),
        }
    }

    pub fn editor_text(&self, value: &CellValue) -> String {
        match (self.kind, value) {
            (ColumnType::Date, value) => value_date(value)
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| value.to_string()),
            (ColumnType::DateTime, CellValue::DateTime(datetime)) => {
                datetime.format("%Y-%m-%dT%H:%M").to_string()
            }
            (_, value) => value.to_string(),
        }
    }

    pub fn input_type(&self) -> &'static str {
        match self.kind {
            ColumnType::String => "text",
            ColumnType::Number => "number",
            ColumnType::Date => "date",
            ColumnType::DateTime => "datetime-local",
        }
    }

    /// Turns editor text into a typed value. Empty input clears the cell and
    /// input that does not fit the column type is kept as text.
    pub fn parse_input(&self, input: &str) -> CellValue {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return CellValue::Null;
        }
        let parsed = match self.kind {
            ColumnType::String => return CellValue::Text(input.to_string()),
            ColumnType::Number => parse_number(trimmed),
            ColumnType::Date => parse_date_text(trimmed).map(CellValue::Date),
            ColumnType::DateTime => parse_datetime_text(trimmed)
                .map(CellValue::DateTime)
                .or_else(|| {
                    parse_date_text(trimmed)
                        .and_then(|date| date.and_hms_opt(0, 0, 0))
                        .map(CellValue::DateTime)
                }),
        };
        parsed.unwrap_or_else(|| CellValue::Text(input.to_string()))
    }
}

pub(crate) fn parse_number(text: &str) -> Option<CellValue> {
    let cleaned = strip_thousands_separators(text.trim())?;
    if let Ok(value) = cleaned.parse::<i64>() {
        return Some(CellValue::Int(value));
    }
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(CellValue::Float)
}

// Commas are only accepted as thousands separators: `1,200` but not `1,2`.
fn strip_thousands_separators(text: &str) -> Option<String> {
    if !text.contains(',') {
        return Some(text.to_string());
    }
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text, None),
    };
    if fraction.is_some_and(|fraction| fraction.contains(',')) {
        return None;
    }
    let digits = whole.strip_prefix(['-', '+']).unwrap_or(whole);
    let mut groups = digits.split(',');
    let leading = groups.next()?;
    if leading.is_empty() || leading.len() > 3 || !leading.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if !groups.all(|group| group.len() == 3 && group.bytes().all(|b| b.is_ascii_digit())) {
        return None;
    }
    Some(text.replace(',', ""))
}

pub fn default_columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("name", "Name", ColumnType::String),
        ColumnDef::new("age", "Age", ColumnType::Number),
        ColumnDef::new("date", "Date", ColumnType::Date),
    ]
}
