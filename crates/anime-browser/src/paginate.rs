//! Fixed-size paging over an in-memory working set.
//!
//! Pages are 1-based. Slicing never allocates and never panics: a page index
//! outside `1..=total_pages` simply yields no items.

use std::num::NonZeroUsize;

/// One page sliced out of a record sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub page_index: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub is_first_page: bool,
    pub is_last_page: bool,
}

impl<T> Page<'_, T> {
    /// Navigation metadata for this page
    pub fn meta(&self) -> PaginationMeta {
        PaginationMeta {
            current_page: self.page_index,
            total_pages: self.total_pages,
            total_items: self.total_items,
            is_first_page: self.is_first_page,
            is_last_page: self.is_last_page,
        }
    }
}

/// Pagination state handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationMeta {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub is_first_page: bool,
    pub is_last_page: bool,
}

impl PaginationMeta {
    /// "Page X of Y"
    pub fn label(&self) -> String {
        format!("Page {} of {}", self.current_page, self.total_pages)
    }
}

/// `max(1, ceil(len / page_size))`
pub fn total_pages(len: usize, page_size: NonZeroUsize) -> usize {
    len.div_ceil(page_size.get()).max(1)
}

/// Slice page `page_index` (1-based) out of `records`.
///
/// Callers clamp `page_index` first; out-of-range indexes give an empty slice.
pub fn paginate<T>(records: &[T], page_index: usize, page_size: NonZeroUsize) -> Page<'_, T> {
    let total = total_pages(records.len(), page_size);
    let size = page_size.get();

    let items = match page_index.checked_sub(1) {
        Some(offset) if page_index <= total => {
            let start = offset.saturating_mul(size).min(records.len());
            let end = start.saturating_add(size).min(records.len());
            &records[start..end]
        }
        _ => &records[..0],
    };

    Page {
        items,
        page_index,
        total_pages: total,
        total_items: records.len(),
        is_first_page: page_index <= 1,
        is_last_page: page_index >= total,
    }
}

/// Page before `page_index`, or `page_index` itself on the first page
pub fn previous_page(page_index: usize) -> usize {
    if page_index > 1 {
        page_index - 1
    } else {
        page_index
    }
}

/// Page after `page_index`, or `page_index` itself on the last page
pub fn next_page(page_index: usize, total_pages: usize) -> usize {
    if page_index < total_pages {
        page_index + 1
    } else {
        page_index
    }
}

/// Clamp into `1..=total_pages`
pub fn clamp_page(page_index: usize, total_pages: usize) -> usize {
    page_index.clamp(1, total_pages.max(1))
}
