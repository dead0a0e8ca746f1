//! Page-number pagination for the product listing.
//!
//! Clients ask for a 1-based `page` and an optional `per_page`. Both are parsed leniently:
//! anything that is not an integer falls back to the default instead of rejecting the request,
//! and `per_page` is clamped to the configured bounds.

use serde::Deserialize;
use serde_with::{DefaultOnError, DisplayFromStr, serde_as};
use utoipa::{IntoParams, ToSchema};

use crate::config::PaginationConfig;

/// Smallest page size a client can ask for
pub const MIN_PER_PAGE: i64 = 1;

/// Pagination query parameters
#[serde_as]
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct Pagination {
    /// 1-based page number (default: 1)
    #[param(default = 1, minimum = 1)]
    #[serde(default)]
    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    pub page: Option<i64>,

    /// Items per page (default and maximum come from configuration)
    #[param(minimum = 1)]
    #[serde(default)]
    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    pub per_page: Option<i64>,
}

impl Pagination {
    /// Requested page, at least 1
    #[inline]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Requested page size, clamped to `MIN_PER_PAGE..=config.max_per_page`
    #[inline]
    pub fn per_page(&self, config: &PaginationConfig) -> i64 {
        self.per_page
            .unwrap_or(config.default_per_page)
            .clamp(MIN_PER_PAGE, config.max_per_page.max(MIN_PER_PAGE))
    }

    pub fn request(&self, config: &PaginationConfig) -> PageRequest {
        PageRequest {
            page: self.page(),
            per_page: self.per_page(config),
        }
    }
}

/// A resolved page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(MIN_PER_PAGE),
        }
    }

    /// Number of rows to skip before this page
    #[inline]
    pub fn skip(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    #[inline]
    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

/// One page of results plus the metadata needed to render navigation
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Items matching the query across all pages
    pub total: i64,
    pub current_page: i64,
    pub per_page: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            current_page: request.page,
            per_page: request.per_page,
        }
    }

    /// Number of the last page, at least 1 even when there are no items
    pub fn last_page(&self) -> i64 {
        let per_page = self.per_page.max(MIN_PER_PAGE);
        ((self.total + per_page - 1) / per_page).max(1)
    }

    pub fn on_first_page(&self) -> bool {
        self.current_page <= 1
    }

    pub fn has_more_pages(&self) -> bool {
        self.current_page < self.last_page()
    }

    /// Whether navigation is worth showing at all
    pub fn has_pages(&self) -> bool {
        !self.on_first_page() || self.has_more_pages()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            current_page: self.current_page,
            per_page: self.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PaginationConfig {
        PaginationConfig {
            default_per_page: 10,
            max_per_page: 100,
        }
    }

    fn page_of(total: i64, page: i64, per_page: i64) -> Page<i64> {
        let request = PageRequest::new(page, per_page);
        let items = (request.skip()..total).take(request.limit() as usize).collect();
        Page::new(items, total, request)
    }

    #[test]
    fn test_default_values() {
        let p = Pagination::default();
        assert_eq!(p.page(), 1);
        assert_eq!(p.per_page(&config()), 10);
    }

    #[test]
    fn test_per_page_clamping() {
        let p = Pagination {
            page: None,
            per_page: Some(0),
        };
        assert_eq!(p.per_page(&config()), 1);

        let p = Pagination {
            page: None,
            per_page: Some(1000),
        };
        assert_eq!(p.per_page(&config()), 100);

        let p = Pagination {
            page: Some(-4),
            per_page: Some(25),
        };
        assert_eq!(p.request(&config()), PageRequest { page: 1, per_page: 25 });
    }

    #[test]
    fn test_lenient_query_parsing() {
        let p: Pagination = serde_json::from_value(serde_json::json!({ "page": "abc", "per_page": "5" })).unwrap();
        assert_eq!(p.page, None);
        assert_eq!(p.per_page, Some(5));

        let p: Pagination = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(p.page, None);
    }

    #[test]
    fn test_skip() {
        assert_eq!(PageRequest::new(1, 10).skip(), 0);
        assert_eq!(PageRequest::new(3, 10).skip(), 20);
        assert_eq!(PageRequest::new(i64::MAX, 100).skip(), i64::MAX);
    }

    #[test]
    fn test_page_metadata() {
        let third = page_of(25, 3, 10);
        assert_eq!(third.items.len(), 5);
        assert_eq!(third.last_page(), 3);
        assert!(!third.has_more_pages());
        assert!(!third.on_first_page());
        assert!(third.has_pages());

        let second = page_of(25, 2, 10);
        assert!(!second.on_first_page());
        assert!(second.has_more_pages());
    }

    #[test]
    fn test_single_page_has_no_navigation() {
        let only = page_of(10, 1, 10);
        assert_eq!(only.last_page(), 1);
        assert!(!only.has_pages());

        let empty = page_of(0, 1, 10);
        assert_eq!(empty.last_page(), 1);
        assert!(empty.items.is_empty());
        assert!(!empty.has_pages());
    }

    #[test]
    fn test_page_past_the_end_is_empty() {
        let beyond = page_of(25, 9, 10);
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total, 25);
        assert!(beyond.has_pages());
    }
}
