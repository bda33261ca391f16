//! Offset pagination with clamped bounds.

use serde::Serialize;

pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 50;

/// A validated page request. `page` starts at 1; `limit` is clamped to
/// `1..=50` with a default of 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    pub fn clamped(page: Option<u64>, limit: Option<u64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        }
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.limit
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::clamped(None, None)
    }
}

/// One page of results plus the totals clients need to render a pager.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            page: request.page,
            limit: request.limit,
            total,
            total_pages: total.div_ceil(request.limit),
        }
    }

    /// Convert the items while keeping the page metadata, e.g. into DTOs.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            limit: self.limit,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_limit_and_page() {
        assert_eq!(
            PageRequest::clamped(None, None),
            PageRequest { page: 1, limit: 10 }
        );
        assert_eq!(
            PageRequest::clamped(Some(0), Some(0)),
            PageRequest { page: 1, limit: 1 }
        );
        assert_eq!(
            PageRequest::clamped(Some(3), Some(500)),
            PageRequest { page: 3, limit: 50 }
        );
    }

    #[test]
    fn offset_is_zero_based() {
        assert_eq!(PageRequest { page: 1, limit: 8 }.offset(), 0);
        assert_eq!(PageRequest { page: 3, limit: 8 }.offset(), 16);
    }

    #[test]
    fn total_pages_rounds_up() {
        let request = PageRequest { page: 3, limit: 8 };
        let page = Page::new(vec![1], request, 17);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total, 17);
    }

    #[test]
    fn total_pages_is_zero_for_no_results() {
        let page: Page<u8> = Page::new(vec![], PageRequest::default(), 0);
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn map_preserves_metadata() {
        let page = Page::new(vec![1, 2], PageRequest { page: 2, limit: 2 }, 5).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 3);
    }
}
