//! Fixed-size windows over an ordered row sequence.
//!
//! Pages are 1-indexed. Out-of-range input never errors: it yields an empty
//! window. Clamping a user-supplied page number is the caller's job
//! (see [`clamp_page`]).

use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Rows `[(page_number-1)*page_size, page_number*page_size)`, clipped to the table
pub fn page<R>(rows: &[R], page_number: usize, page_size: usize) -> &[R] {
    if page_number == 0 || page_size == 0 {
        return &[];
    }

    let start = match (page_number - 1).checked_mul(page_size) {
        Some(start) if start < rows.len() => start,
        _ => return &[],
    };
    let end = start.saturating_add(page_size).min(rows.len());

    &rows[start..end]
}

/// `ceil(count / page_size)`; 0 for an empty table
pub fn page_count(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Clamp a requested page number into `1..=max(1, page_count)`
pub fn clamp_page(page_number: usize, count: usize, page_size: usize) -> usize {
    page_number.clamp(1, page_count(count, page_size).max(1))
}

/// One page of rows plus the numbers a table view needs to draw its pager
#[derive(Debug, Clone, Serialize)]
pub struct PageWindow<'a, R> {
    pub page: usize,
    pub page_size: usize,
    pub total_rows: usize,
    pub total_pages: usize,
    pub rows: &'a [R],
}

impl<'a, R> PageWindow<'a, R> {
    pub fn new(rows: &'a [R], page_number: usize, page_size: usize) -> Self {
        Self {
            page: page_number,
            page_size,
            total_rows: rows.len(),
            total_pages: page_count(rows.len(), page_size),
            rows: page(rows, page_number, page_size),
        }
    }

    /// Index of the first row of this window within the full table
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }
}
