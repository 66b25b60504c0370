use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::domain::entities::column::parse_number;
use crate::domain::entities::row::{CellValue, Row};

#[derive(Debug, Clone, PartialEq)]
pub struct ImportedRows {
    pub fields: Vec<String>,
    pub rows: Vec<Row>,
}

/// Loads a headed CSV file as a row collection. When the header lacks
/// `unique_key_field`, rows are keyed 1, 2, 3... in file order.
pub fn import_csv_rows(csv_path: &Path, unique_key_field: &str) -> Result<ImportedRows> {
    let reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open csv: {}", csv_path.display()))?;
    let imported = read_rows(reader, unique_key_field)
        .with_context(|| format!("failed to import csv: {}", csv_path.display()))?;
    info!(
        path = %csv_path.display(),
        rows = imported.rows.len(),
        columns = imported.fields.len(),
        "imported csv rows"
    );
    Ok(imported)
}

pub fn read_csv_rows(input: impl Read, unique_key_field: &str) -> Result<ImportedRows> {
    read_rows(csv::Reader::from_reader(input), unique_key_field)
}

fn read_rows<R: Read>(mut reader: csv::Reader<R>, unique_key_field: &str) -> Result<ImportedRows> {
    let headers = reader
        .headers()
        .context("failed to read csv headers")?
        .clone();

    if headers.is_empty() || headers.iter().all(|header| header.trim().is_empty()) {
        anyhow::bail!("csv header is required")
    }

    let mut fields: Vec<String> = headers.iter().map(|header| header.trim().to_string()).collect();
    let has_key = fields.iter().any(|field| field == unique_key_field);

    let mut rows = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("failed to parse csv record {}", row_idx + 1))?;
        let mut row: Row = fields
            .iter()
            .enumerate()
            .map(|(col_idx, field)| {
                let raw = record.get(col_idx).unwrap_or("");
                let value = if field == unique_key_field {
                    key_cell(raw)
                } else {
                    infer_cell(raw)
                };
                (field.clone(), value)
            })
            .collect();
        if !has_key {
            row.set(unique_key_field, row_idx as i64 + 1);
        }
        rows.push(row);
    }

    if !has_key {
        fields.insert(0, unique_key_field.to_string());
    }
    Ok(ImportedRows { fields, rows })
}

// Key cells are taken verbatim so `007` and `7` stay distinct rows.
fn key_cell(raw: &str) -> CellValue {
    if raw.trim().is_empty() {
        CellValue::Null
    } else {
        CellValue::Text(raw.to_string())
    }
}

fn infer_cell(raw: &str) -> CellValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return CellValue::Null;
    }
    if has_leading_zero(trimmed) {
        return CellValue::Text(raw.to_string());
    }
    parse_number(trimmed).unwrap_or_else(|| CellValue::Text(raw.to_string()))
}

fn has_leading_zero(text: &str) -> bool {
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    digits.len() > 1 && digits.starts_with('0') && !digits[1..].starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::row::RowKey;

    #[test]
    fn infers_numbers_and_blanks() {
        let imported = read_csv_rows("id,name,age,score\n1,Ann,30,4.5\n2,Bob,,x\n".as_bytes(), "id")
            .expect("csv should parse");

        assert_eq!(imported.fields, vec!["id", "name", "age", "score"]);
        assert_eq!(imported.rows.len(), 2);
        assert_eq!(imported.rows[0].value("age"), &CellValue::Int(30));
        assert_eq!(imported.rows[0].value("score"), &CellValue::Float(4.5));
        assert_eq!(imported.rows[1].value("age"), &CellValue::Null);
        assert_eq!(imported.rows[1].value("score"), &CellValue::from("x"));
    }

    #[test]
    fn codes_and_keys_keep_their_text() {
        let imported = read_csv_rows(
            "id,code,amount,ratio\n007,007,\"1,2\",0.5\n7,0,\"1,200\",-0.25\n".as_bytes(),
            "id",
        )
        .expect("csv should parse");

        let first = &imported.rows[0];
        assert_eq!(first.value("code"), &CellValue::from("007"));
        assert_eq!(first.value("amount"), &CellValue::from("1,2"));
        assert_eq!(first.value("ratio"), &CellValue::Float(0.5));

        let second = &imported.rows[1];
        assert_eq!(second.value("code"), &CellValue::Int(0));
        assert_eq!(second.value("amount"), &CellValue::Int(1200));
        assert_eq!(second.value("ratio"), &CellValue::Float(-0.25));

        let keys: Vec<Option<RowKey>> = imported.rows.iter().map(|row| row.key("id")).collect();
        assert_eq!(
            keys,
            vec![Some(RowKey::from("007")), Some(RowKey::from("7"))],
            "key column is never converted"
        );
    }

    #[test]
    fn missing_key_column_is_generated() {
        let imported =
            read_csv_rows("name\nAnn\nBob\n".as_bytes(), "id").expect("csv should parse");

        assert_eq!(imported.fields, vec!["id", "name"]);
        let keys: Vec<Option<RowKey>> = imported.rows.iter().map(|row| row.key("id")).collect();
        assert_eq!(keys, vec![Some(RowKey::Int(1)), Some(RowKey::Int(2))]);
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = read_csv_rows("".as_bytes(), "id").expect_err("no header");
        assert!(err.to_string().contains("csv header is required"), "{err:#}");
    }
}
