//! Fixed-size windowing over an ordered result set.
//!
//! The arithmetic lives here; the actual slicing is performed by the store
//! against an already-ordered query. Out-of-range page numbers clamp to the
//! nearest valid page rather than failing, mirroring the behavior users
//! expect from `?page=` links.

use serde::Serialize;

/// Default page size when the deployment does not configure one.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// A requested window: 1-based page number plus page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    number: u64,
    per_page: u64,
}

impl PageRequest {
    /// Build a request. Page numbers below 1 and a zero page size are
    /// normalized to 1.
    pub fn new(number: u64, per_page: u64) -> Self {
        Self {
            number: number.max(1),
            per_page: per_page.max(1),
        }
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Clamp the page number into `1..=total_pages`.
    pub fn clamp_to(self, total_pages: u64) -> Self {
        Self {
            number: self.number.min(total_pages.max(1)),
            per_page: self.per_page,
        }
    }

    /// Number of items preceding this page.
    pub fn offset(&self) -> u64 {
        (self.number - 1) * self.per_page
    }
}

/// One page of an ordered result set plus paging metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub per_page: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Assemble a page from the fetched slice and the total item count.
    /// The request is expected to be clamped already.
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        Self {
            items,
            number: request.number,
            per_page: request.per_page,
            total_items,
            total_pages: total_pages(total_items, request.per_page),
        }
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn next_number(&self) -> u64 {
        self.number + 1
    }

    pub fn previous_number(&self) -> u64 {
        self.number - 1
    }
}

/// Total page count. An empty result set still has one (empty) page.
pub fn total_pages(total_items: u64, per_page: u64) -> u64 {
    if total_items == 0 {
        1
    } else {
        total_items.div_ceil(per_page.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetch(n: u64, request: PageRequest) -> Vec<u64> {
        // What the store does: slice an ordered sequence of n items.
        (0..n)
            .skip(request.offset() as usize)
            .take(request.per_page() as usize)
            .collect()
    }

    #[test]
    fn page_k_holds_expected_item_count() {
        let (n, p) = (23u64, 10u64);
        for k in 1..=total_pages(n, p) {
            let request = PageRequest::new(k, p);
            let expected = p.min(n - (k - 1) * p);
            assert_eq!(fetch(n, request).len() as u64, expected, "page {k}");
        }
    }

    #[test]
    fn out_of_range_pages_clamp() {
        let pages = total_pages(23, 10);
        assert_eq!(PageRequest::new(99, 10).clamp_to(pages).number(), 3);
        assert_eq!(PageRequest::new(0, 10).clamp_to(pages).number(), 1);
    }

    #[test]
    fn empty_result_set_is_one_empty_page() {
        assert_eq!(total_pages(0, 10), 1);
        let request = PageRequest::new(5, 10).clamp_to(total_pages(0, 10));
        assert_eq!(request.number(), 1);

        let page: Page<u64> = Page::new(vec![], request, 0);
        assert!(page.items.is_empty());
        assert!(!page.has_next());
        assert!(!page.has_previous());
    }

    #[test]
    fn metadata_tracks_position() {
        let request = PageRequest::new(2, 10);
        let page = Page::new(fetch(23, request), request, 23);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next());
        assert!(page.has_previous());
        assert_eq!(page.next_number(), 3);
        assert_eq!(page.previous_number(), 1);
    }

    #[test]
    fn exact_multiple_has_no_trailing_page() {
        assert_eq!(total_pages(20, 10), 2);
        assert_eq!(total_pages(21, 10), 3);
        assert_eq!(total_pages(10, 10), 1);
    }
}
