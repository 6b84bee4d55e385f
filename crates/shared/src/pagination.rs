//! Page-number pagination types shared by list endpoints.

use serde::Serialize;

/// Default page size when the caller does not specify one.
pub const DEFAULT_PER_PAGE: i64 = 20;

/// Upper bound on page size; larger requests are clamped, not rejected.
pub const MAX_PER_PAGE: i64 = 100;

/// Normalized paging parameters.
///
/// Built from the raw optional query values; guarantees `page >= 1` and
/// `1 <= per_page <= MAX_PER_PAGE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    page: i64,
    per_page: i64,
}

impl PageParams {
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE),
        }
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
    }

    /// SQL OFFSET for this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Paging metadata returned alongside list items.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PageInfo {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
}

/// One page of results plus paging metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: PageInfo,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, params: PageParams, total: i64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + params.per_page - 1) / params.per_page
        };
        Self {
            items,
            pagination: PageInfo {
                page: params.page,
                per_page: params.per_page,
                total,
                total_pages,
            },
        }
    }

    /// Converts the item type while keeping the paging metadata.
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
    fn test_page_params_defaults() {
        let params = PageParams::new(None, None);
        assert_eq!(params.page(), 1);
        assert_eq!(params.per_page(), DEFAULT_PER_PAGE);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_page_params_clamps_page() {
        assert_eq!(PageParams::new(Some(0), None).page(), 1);
        assert_eq!(PageParams::new(Some(-5), None).page(), 1);
        assert_eq!(PageParams::new(Some(7), None).page(), 7);
    }

    #[test]
    fn test_page_params_clamps_per_page() {
        assert_eq!(PageParams::new(None, Some(0)).per_page(), 1);
        assert_eq!(PageParams::new(None, Some(1000)).per_page(), MAX_PER_PAGE);
        assert_eq!(PageParams::new(None, Some(25)).per_page(), 25);
    }

    #[test]
    fn test_page_params_offset() {
        let params = PageParams::new(Some(3), Some(20));
        assert_eq!(params.offset(), 40);
    }

    #[test]
    fn test_page_total_pages_rounds_up() {
        let params = PageParams::new(Some(1), Some(20));
        let page = Page::new(vec![1, 2, 3], params, 41);
        assert_eq!(page.pagination.total_pages, 3);
        assert_eq!(page.pagination.total, 41);
    }

    #[test]
    fn test_page_empty() {
        let page: Page<i32> = Page::new(vec![], PageParams::default(), 0);
        assert_eq!(page.pagination.total_pages, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_page_map_preserves_pagination() {
        let params = PageParams::new(Some(2), Some(10));
        let page = Page::new(vec![1, 2], params, 12);
        let mapped = page.map(|n| n.to_string());
        assert_eq!(mapped.items, vec!["1".to_string(), "2".to_string()]);
        assert_eq!(mapped.pagination.page, 2);
        assert_eq!(mapped.pagination.total_pages, 2);
    }

    #[test]
    fn test_page_serialization_shape() {
        let page = Page::new(vec![1, 2], PageParams::new(Some(1), Some(2)), 5);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["items"], serde_json::json!([1, 2]));
        assert_eq!(json["pagination"]["page"], 1);
        assert_eq!(json["pagination"]["per_page"], 2);
        assert_eq!(json["pagination"]["total"], 5);
        assert_eq!(json["pagination"]["total_pages"], 3);
    }
}
