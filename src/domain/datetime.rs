use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::domain::entities::row::CellValue;

pub const STORED_DATE_FORMAT: &str = "%Y/%m/%d";
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";
pub const DISPLAY_DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M";

const DATETIME_LAYOUTS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
];
const DATE_LAYOUTS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

pub fn parse_datetime_text(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(value) = DateTime::parse_from_rfc3339(text) {
        return Some(value.naive_local());
    }
    DATETIME_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(text, layout).ok())
}

pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    parse_datetime_text(text)
        .map(|value| value.date())
        .or_else(|| {
            DATE_LAYOUTS
                .iter()
                .find_map(|layout| NaiveDate::parse_from_str(text, layout).ok())
        })
}

pub fn value_date(value: &CellValue) -> Option<NaiveDate> {
    match value {
        CellValue::Date(date) => Some(*date),
        CellValue::DateTime(datetime) => Some(datetime.date()),
        CellValue::Text(text) => parse_date_text(text),
        _ => None,
    }
}

pub fn canonical_date(value: &CellValue) -> Option<String> {
    value_date(value).map(|date| date.format(STORED_DATE_FORMAT).to_string())
}

pub fn display_date(value: &CellValue) -> Option<String> {
    value_date(value).map(|date| date.format(DISPLAY_DATE_FORMAT).to_string())
}

pub fn display_datetime(value: &CellValue) -> Option<String> {
    let datetime = match value {
        CellValue::DateTime(datetime) => Some(*datetime),
        CellValue::Date(date) => date.and_hms_opt(0, 0, 0),
        CellValue::Text(text) => parse_datetime_text(text)
            .or_else(|| parse_date_text(text).and_then(|date| date.and_hms_opt(0, 0, 0))),
        _ => None,
    }?;
    Some(datetime.format(DISPLAY_DATETIME_FORMAT).to_string())
}
