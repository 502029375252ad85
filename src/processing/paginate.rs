//! Fixed-size pagination over a filtered row count.

use std::ops::Range;

/// Rows per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Current page (1-based) and page size.
///
/// The page always lies in `[1, total_pages(count)]`; out-of-range requests clamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_size: usize,
    page: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pagination {
    /// Start on page 1. A page size of `0` is treated as `1`.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            page: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// `max(1, ceil(count / page_size))`.
    pub fn total_pages(&self, count: usize) -> usize {
        count.div_ceil(self.page_size).max(1)
    }

    /// Move to `page`, clamped into range. Returns the resulting page.
    pub fn set_page(&mut self, page: usize, count: usize) -> usize {
        self.page = page.clamp(1, self.total_pages(count));
        self.page
    }

    /// Re-clamp the current page after `count` changed.
    pub fn clamp(&mut self, count: usize) -> usize {
        self.set_page(self.page, count)
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self, count: usize) -> bool {
        self.page < self.total_pages(count)
    }

    /// Positions of the current page's rows within the filtered sequence.
    pub fn range(&self, count: usize) -> Range<usize> {
        let start = ((self.page - 1) * self.page_size).min(count);
        let end = (start + self.page_size).min(count);
        start..end
    }
}
