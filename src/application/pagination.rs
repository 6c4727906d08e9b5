//! Numbered page slicing over in-memory lists.

use std::num::NonZeroU32;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// One-based page number; zero is treated as the first page.
    pub page: usize,
    pub per_page: NonZeroU32,
}

impl PageRequest {
    pub fn new(page: usize, per_page: NonZeroU32) -> Self {
        Self { page, per_page }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberedPage<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> NumberedPage<T> {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Slice `items` into the requested page, clamping past-the-end requests to
/// the last page.
pub fn paginate<T: Clone>(items: &[T], request: PageRequest) -> NumberedPage<T> {
    let per_page = request.per_page.get() as usize;
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page).max(1);
    let page = request.page.clamp(1, total_pages);

    let start = (page - 1) * per_page;
    let end = (start + per_page).min(total_items);
    NumberedPage {
        items: items[start.min(end)..end].to_vec(),
        page,
        total_pages,
        total_items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn per_page(value: u32) -> NonZeroU32 {
        NonZeroU32::new(value).expect("non-zero")
    }

    #[test]
    fn slices_requested_page() {
        let items: Vec<u32> = (1..=7).collect();
        let page = paginate(&items, PageRequest::new(2, per_page(3)));
        assert_eq!(page.items, vec![4, 5, 6]);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn clamps_out_of_range_pages() {
        let items: Vec<u32> = (1..=7).collect();
        let last = paginate(&items, PageRequest::new(10, per_page(3)));
        assert_eq!(last.page, 3);
        assert_eq!(last.items, vec![7]);

        let first = paginate(&items, PageRequest::new(0, per_page(3)));
        assert_eq!(first.page, 1);
    }

    #[test]
    fn empty_lists_have_one_empty_page() {
        let page = paginate::<u32>(&[], PageRequest::new(1, per_page(6)));
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_next());
    }
}
