use crate::domain::entities::edit::SelectionSet;
use crate::domain::entities::row::Row;

pub trait RowSink {
    fn set_rows(&mut self, rows: Vec<Row>);
}

pub trait SelectionSink {
    fn set_checked(&mut self, keys: &SelectionSet);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl RowSink for NoopSink {
    fn set_rows(&mut self, _rows: Vec<Row>) {}
}

impl SelectionSink for NoopSink {
    fn set_checked(&mut self, _keys: &SelectionSet) {}
}

impl<F> RowSink for F
where
    F: FnMut(Vec<Row>),
{
    fn set_rows(&mut self, rows: Vec<Row>) {
        self(rows)
    }
}

impl<F> SelectionSink for F
where
    F: FnMut(&SelectionSet),
{
    fn set_checked(&mut self, keys: &SelectionSet) {
        self(keys)
    }
}
