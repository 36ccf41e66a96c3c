//! Page/limit arithmetic shared by every list endpoint.

use serde::Serialize;

/// A validated page request.
///
/// `page` and `limit` are 1-based and never zero; `limit` is capped at
/// [`PageRequest::MAX_LIMIT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Page used when the client sends none.
    pub const DEFAULT_PAGE: u32 = 1;
    /// Page size used when the client sends none.
    pub const DEFAULT_LIMIT: u32 = 10;
    /// Largest page size a client may request.
    pub const MAX_LIMIT: u32 = 100;

    /// Build a page request from untrusted client input.
    ///
    /// Missing values fall back to the defaults; values below one are
    /// floor-clamped to one.
    #[must_use]
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page.map_or(Self::DEFAULT_PAGE, |p| {
            u32::try_from(p.max(1)).unwrap_or(u32::MAX)
        });
        let limit = limit.map_or(Self::DEFAULT_LIMIT, |l| {
            u32::try_from(l.clamp(1, i64::from(Self::MAX_LIMIT))).unwrap_or(Self::MAX_LIMIT)
        });
        Self { page, limit }
    }

    /// The 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// The page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows to skip (`LIMIT … OFFSET …`).
    #[must_use]
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Pagination metadata returned alongside a page of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: i64,
    pub limit: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    /// Compute pagination metadata for `total_count` matching rows.
    ///
    /// `total_pages` is `ceil(total_count / limit)`, so an empty result has
    /// zero pages.
    #[must_use]
    pub fn new(request: PageRequest, total_count: i64) -> Self {
        let total_count = total_count.max(0);
        let limit = i64::from(request.limit());
        let pages = (total_count + limit - 1) / limit;
        let total_pages = u32::try_from(pages).unwrap_or(u32::MAX);

        Self {
            current_page: request.page(),
            total_pages,
            total_count,
            limit: request.limit(),
            has_next: request.page() < total_pages,
            has_prev: request.page() > 1,
        }
    }
}

/// A page of items plus its pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Assemble a page from fetched items and the total match count.
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total_count: i64) -> Self {
        Self {
            items,
            pagination: Pagination::new(request, total_count),
        }
    }

    /// Transform every item, keeping the pagination metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let req = PageRequest::default();
        assert_eq!(req.page(), 1);
        assert_eq!(req.limit(), 10);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_floor_clamp() {
        let req = PageRequest::new(Some(0), Some(-5));
        assert_eq!(req.page(), 1);
        assert_eq!(req.limit(), 1);

        let req = PageRequest::new(Some(-3), Some(0));
        assert_eq!(req.page(), 1);
        assert_eq!(req.limit(), 1);
    }

    #[test]
    fn test_limit_cap() {
        let req = PageRequest::new(Some(2), Some(10_000));
        assert_eq!(req.limit(), PageRequest::MAX_LIMIT);
        assert_eq!(req.offset(), 100);
    }

    #[test]
    fn test_offset() {
        assert_eq!(PageRequest::new(Some(3), Some(20)).offset(), 40);
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        for (total, limit, expected) in [(0, 10, 0), (1, 10, 1), (10, 10, 1), (11, 10, 2), (95, 7, 14)] {
            let p = Pagination::new(PageRequest::new(Some(1), Some(limit)), total);
            assert_eq!(p.total_pages, expected, "total={total} limit={limit}");
        }
    }

    #[test]
    fn test_next_prev_flags() {
        let first = Pagination::new(PageRequest::new(Some(1), Some(10)), 25);
        assert!(first.has_next);
        assert!(!first.has_prev);

        let last = Pagination::new(PageRequest::new(Some(3), Some(10)), 25);
        assert!(!last.has_next);
        assert!(last.has_prev);

        let beyond = Pagination::new(PageRequest::new(Some(9), Some(10)), 25);
        assert!(!beyond.has_next);
        assert!(beyond.has_prev);
    }

    #[test]
    fn test_empty_result() {
        let p = Pagination::new(PageRequest::default(), 0);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next);
        assert!(!p.has_prev);
    }

    #[test]
    fn test_page_serializes_camel_case() {
        let page = Page::new(vec![1, 2], PageRequest::new(Some(1), Some(2)), 3);
        let json = serde_json::to_value(&page).unwrap_or_default();
        assert_eq!(json["pagination"]["totalCount"], 3);
        assert_eq!(json["pagination"]["currentPage"], 1);
        assert_eq!(json["pagination"]["hasNext"], true);
        assert_eq!(json["items"].as_array().map(Vec::len), Some(2));
    }
}
