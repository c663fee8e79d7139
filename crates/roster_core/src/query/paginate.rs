//! Page slicing helpers.

/// Returns the slice `[page_index * page_size, page_index * page_size + page_size)`,
/// clamped to `items`. Empty when the page starts past the end or `page_size` is 0.
pub fn paginate<T: Clone>(items: &[T], page_index: usize, page_size: usize) -> Vec<T> {
    if page_size == 0 {
        return Vec::new();
    }
    let Some(start) = page_index.checked_mul(page_size) else {
        return Vec::new();
    };
    if start >= items.len() {
        return Vec::new();
    }
    let end = start.saturating_add(page_size).min(items.len());
    items[start..end].to_vec()
}

/// Number of pages needed for `total` items; 0 when `page_size` is 0.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Zero-based page indices for `total` items.
pub fn page_numbers(total: usize, page_size: usize) -> Vec<usize> {
    (0..total_pages(total, page_size)).collect()
}
