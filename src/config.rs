use std::collections::BTreeSet;

use thiserror::Error;

use crate::domain::entities::column::{default_columns, ColumnDef};
use crate::usecase::services::reconcile::{DEFAULT_DATE_FIELD, DEFAULT_UNIQUE_KEY_FIELD};

pub const DEFAULT_PAGE_SIZE: usize = 5;
pub const DEFAULT_PAGE_SIZE_OPTIONS: [usize; 5] = [5, 10, 25, 50, 100];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unique key field must not be empty")]
    EmptyUniqueKeyField,
    #[error("page size must be greater than zero")]
    ZeroPageSize,
    #[error("page size {page_size} is not one of the offered sizes {options:?}")]
    PageSizeNotOffered {
        page_size: usize,
        options: Vec<usize>,
    },
    #[error("column field `{0}` is defined more than once")]
    DuplicateColumn(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridConfig {
    pub unique_key_field: String,
    pub date_field: String,
    pub columns: Vec<ColumnDef>,
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            unique_key_field: DEFAULT_UNIQUE_KEY_FIELD.to_string(),
            date_field: DEFAULT_DATE_FIELD.to_string(),
            columns: default_columns(),
            page_size: DEFAULT_PAGE_SIZE,
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
        }
    }
}

impl GridConfig {
    pub fn with_unique_key_field(mut self, field: impl Into<String>) -> Self {
        self.unique_key_field = field.into();
        self
    }

    pub fn with_date_field(mut self, field: impl Into<String>) -> Self {
        self.date_field = field.into();
        self
    }

    pub fn with_columns(mut self, columns: Vec<ColumnDef>) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_page_size_options(mut self, options: Vec<usize>) -> Self {
        self.page_size_options = options;
        self
    }

    pub fn column(&self, field: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|column| column.field == field)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.unique_key_field.trim().is_empty() {
            return Err(ConfigError::EmptyUniqueKeyField);
        }
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        if !self.page_size_options.is_empty() && !self.page_size_options.contains(&self.page_size)
        {
            return Err(ConfigError::PageSizeNotOffered {
                page_size: self.page_size,
                options: self.page_size_options.clone(),
            });
        }
        let mut seen = BTreeSet::new();
        for column in &self.columns {
            if !seen.insert(column.field.as_str()) {
                return Err(ConfigError::DuplicateColumn(column.field.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::column::ColumnType;

    #[test]
    fn defaults_are_valid() {
        let config = GridConfig::default();
        assert_eq!(config.unique_key_field, "id");
        assert_eq!(config.date_field, "date");
        assert_eq!(config.page_size, 5);
        assert_eq!(config.page_size_options, vec![5, 10, 25, 50, 100]);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn blank_key_field_is_rejected() {
        let config = GridConfig::default().with_unique_key_field("  ");
        assert_eq!(config.validate(), Err(ConfigError::EmptyUniqueKeyField));
    }

    #[test]
    fn page_size_must_be_offered() {
        let config = GridConfig::default().with_page_size(7);
        let err = config.validate().expect_err("7 is not offered");
        assert_eq!(
            err.to_string(),
            "page size 7 is not one of the offered sizes [5, 10, 25, 50, 100]"
        );

        let free = GridConfig::default()
            .with_page_size(7)
            .with_page_size_options(Vec::new());
        assert_eq!(free.validate(), Ok(()), "no options means any size");
        assert_eq!(
            GridConfig::default().with_page_size(0).validate(),
            Err(ConfigError::ZeroPageSize)
        );
    }

    #[test]
    fn duplicate_column_fields_are_rejected() {
        let config = GridConfig::default().with_columns(vec![
            ColumnDef::new("name", "Name", ColumnType::String),
            ColumnDef::new("name", "Name again", ColumnType::String).read_only(),
        ]);
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateColumn("name".to_string()))
        );
    }

    #[test]
    fn column_lookup_by_field() {
        let config = GridConfig::default();
        assert_eq!(
            config.column("age").map(|column| column.kind),
            Some(ColumnType::Number)
        );
        assert!(config.column("salary").is_none());
    }
}
