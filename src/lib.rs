pub mod config;

pub mod domain {
    pub mod datetime;

    pub mod entities {
        pub mod column;
        pub mod edit;
        pub mod page;
        pub mod row;
    }
}

pub mod usecase {
    pub mod ports {
        pub mod sink;
    }

    pub mod services {
        pub mod grid;
        pub mod reconcile;
        pub mod selection;
    }
}

pub mod infra {
    pub mod import {
        pub mod csv;
    }
}

pub use config::{ConfigError, GridConfig};
pub use domain::entities::column::{default_columns, ColumnDef, ColumnType};
pub use domain::entities::edit::{CellEdit, SelectionSet};
pub use domain::entities::page::PageWindow;
pub use domain::entities::row::{CellValue, Row, RowKey};
pub use usecase::ports::sink::{NoopSink, RowSink, SelectionSink};
pub use usecase::services::grid::EditableGrid;
pub use usecase::services::reconcile::RowReconciler;
pub use usecase::services::selection::{select_rows, SelectionHandle, SelectionTracker};
