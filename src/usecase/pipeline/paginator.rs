use std::fmt;

use crate::domain::entities::list_query::PageWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginateError {
    ZeroPageSize,
    OutOfRange { page: usize, total_pages: usize },
}

impl fmt::Display for PaginateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaginateError::ZeroPageSize => write!(f, "page_size must be greater than zero"),
            PaginateError::OutOfRange { page, total_pages } => {
                write!(f, "page out of range: {page} (pages: {total_pages})")
            }
        }
    }
}

impl std::error::Error for PaginateError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSlice<'a, T> {
    pub items: &'a [T],
    pub start_index: usize,
    pub end_index: usize,
    pub total_pages: usize,
}

/// Slices one page out of an already ordered collection. Pages are 1-based
/// and the input is trusted: nothing is clamped here.
pub fn paginate<T>(
    ordered: &[T],
    page: usize,
    page_size: usize,
) -> Result<PageSlice<'_, T>, PaginateError> {
    if page_size == 0 {
        return Err(PaginateError::ZeroPageSize);
    }

    let window = PageWindow::new(page, page_size, ordered.len());
    let total_pages = window.total_pages();
    if page == 0 || page > total_pages.max(1) {
        return Err(PaginateError::OutOfRange { page, total_pages });
    }

    let start_index = window.start_index();
    let end_index = window.end_index();
    Ok(PageSlice {
        items: &ordered[start_index..end_index],
        start_index,
        end_index,
        total_pages,
    })
}
