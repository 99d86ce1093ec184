use crate::foundation::utils::InputError;
use serde::Serialize;

/// Position of a page within the full result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

/// One window of a result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

/// Slices `items` into the 1-based page `page` of `page_size` entries.
///
/// Pages past the end come back empty rather than as an error, since the
/// caller only fetched as many results as it expected to show.
///
/// # Examples
///
/// ```
/// use mucat::foundation::utils::paginate;
///
/// let page = paginate(&[1, 2, 3, 4, 5, 6, 7], 3, 3).unwrap();
/// assert_eq!(page.items, vec![7]);
/// assert_eq!(page.pagination.total_pages, 3);
/// ```
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Result<Page<T>, InputError> {
    check_page(page, page_size)?;

    let start = (page - 1).saturating_mul(page_size);
    let window = if start < items.len() {
        let end = start.saturating_add(page_size).min(items.len());
        items[start..end].to_vec()
    } else {
        Vec::new()
    };

    Ok(Page {
        items: window,
        pagination: Pagination {
            page,
            page_size,
            total_items: items.len(),
            total_pages: items.len().div_ceil(page_size),
        },
    })
}

/// Rejects a zero page number or page size.
pub fn check_page(page: usize, page_size: usize) -> Result<(), InputError> {
    if page == 0 || page_size == 0 {
        return Err(InputError::InvalidPage { page, page_size });
    }
    Ok(())
}

/// Number of results to request so that every page up to `page` is covered
/// by a single lookup.
pub fn fetch_limit(page: usize, page_size: usize, floor: usize) -> usize {
    page.saturating_mul(page_size).max(floor)
}
