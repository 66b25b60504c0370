use std::ops::Range;

/// The slice of the row collection currently on screen. Paging is display
/// only; edits and selection always address the full collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: usize,
    pub page_size: usize,
    pub total_rows: usize,
}

impl PageWindow {
    pub fn new(total_rows: usize, page: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let last_page = total_rows.saturating_sub(1) / page_size;
        Self {
            page: page.min(last_page),
            page_size,
            total_rows,
        }
    }

    pub fn page_count(&self) -> usize {
        self.total_rows.div_ceil(self.page_size).max(1)
    }

    pub fn range(&self) -> Range<usize> {
        let start = (self.page * self.page_size).min(self.total_rows);
        let end = (start + self.page_size).min(self.total_rows);
        start..end
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.page_count()
    }
}
