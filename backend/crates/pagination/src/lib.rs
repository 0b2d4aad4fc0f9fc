//! Page-number pagination primitives shared by listing endpoints.
//!
//! A [`PageRequest`] is validated once at the edge and then carried through
//! the domain into persistence adapters, which use [`PageRequest::offset`] and
//! [`PageRequest::limit`] directly. Results travel back wrapped in a [`Page`],
//! whose serialized form is the envelope clients consume:
//!
//! ```json
//! {"items": [...], "pagination": {"total": 42, "totalPages": 5, "currentPage": 1, "limit": 10}}
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page returned when the client does not ask for one.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when the client does not ask for one.
pub const DEFAULT_LIMIT: u32 = 10;
/// Largest page size a client may request.
pub const MAX_LIMIT: u32 = 100;

/// Validation failures for [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// Pages are numbered from one.
    #[error("page must be at least 1, got {page}")]
    PageOutOfRange {
        /// Rejected page number.
        page: u32,
    },
    /// Page size is zero or above [`MAX_LIMIT`].
    #[error("limit must be between 1 and {max}, got {limit}")]
    LimitOutOfRange {
        /// Rejected page size.
        limit: u32,
        /// Largest accepted page size.
        max: u32,
    },
}

/// Validated one-based page request.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(3, 20).expect("valid request");
/// assert_eq!(request.offset(), 40);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Validate an explicit page number and size.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when `page` is zero or `limit` falls
    /// outside `1..=MAX_LIMIT`.
    pub const fn new(page: u32, limit: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::PageOutOfRange { page });
        }
        if limit == 0 || limit > MAX_LIMIT {
            return Err(PageRequestError::LimitOutOfRange {
                limit,
                max: MAX_LIMIT,
            });
        }
        Ok(Self { page, limit })
    }

    /// Build a request from optional query parameters, applying defaults.
    ///
    /// # Errors
    /// Same as [`PageRequest::new`].
    pub fn from_query(page: Option<u32>, limit: Option<u32>) -> Result<Self, PageRequestError> {
        Self::new(page.unwrap_or(DEFAULT_PAGE), limit.unwrap_or(DEFAULT_LIMIT))
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows to skip before this page starts.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Pagination metadata returned alongside a page of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Number of items across all pages.
    pub total: u64,
    /// `ceil(total / limit)`; zero when there are no items.
    pub total_pages: u64,
    /// Page that was requested.
    pub current_page: u32,
    /// Page size that was requested.
    pub limit: u32,
}

impl PageInfo {
    /// Derive metadata for `request` over a collection of `total` items.
    #[must_use]
    pub const fn new(request: PageRequest, total: u64) -> Self {
        Self {
            total,
            total_pages: total.div_ceil(request.limit as u64),
            current_page: request.page,
            limit: request.limit,
        }
    }
}

/// A page of items plus its [`PageInfo`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page, at most `pagination.limit` of them.
    pub items: Vec<T>,
    /// Position of this page within the whole collection.
    pub pagination: PageInfo,
}

impl<T> Page<T> {
    /// Wrap `items` fetched for `request`.
    ///
    /// Adapters should never return more than `request.limit()` items; any
    /// surplus is truncated here so the envelope stays consistent.
    #[must_use]
    pub fn new(mut items: Vec<T>, request: PageRequest, total: u64) -> Self {
        items.truncate(request.limit() as usize);
        Self {
            items,
            pagination: PageInfo::new(request, total),
        }
    }

    /// Convert the items while keeping the pagination metadata.
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
    //! Unit coverage for request validation and envelope maths.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(1, 10, 0)]
    #[case(2, 10, 10)]
    #[case(5, 3, 12)]
    fn offset_skips_previous_pages(#[case] page: u32, #[case] limit: u32, #[case] expected: u64) {
        let request = PageRequest::new(page, limit).expect("valid request");
        assert_eq!(request.offset(), expected);
    }

    #[rstest]
    #[case(0, 10, PageRequestError::PageOutOfRange { page: 0 })]
    #[case(1, 0, PageRequestError::LimitOutOfRange { limit: 0, max: MAX_LIMIT })]
    #[case(1, 101, PageRequestError::LimitOutOfRange { limit: 101, max: MAX_LIMIT })]
    fn rejects_out_of_range_values(
        #[case] page: u32,
        #[case] limit: u32,
        #[case] expected: PageRequestError,
    ) {
        assert_eq!(PageRequest::new(page, limit), Err(expected));
    }

    #[rstest]
    fn query_defaults_apply() {
        let request = PageRequest::from_query(None, None).expect("defaults are valid");
        assert_eq!(request, PageRequest::default());
        assert_eq!(request.page(), DEFAULT_PAGE);
        assert_eq!(request.limit(), DEFAULT_LIMIT);
    }

    #[rstest]
    #[case(0, 10, 0)]
    #[case(1, 10, 1)]
    #[case(10, 10, 1)]
    #[case(11, 10, 2)]
    #[case(25, 4, 7)]
    fn total_pages_is_ceiling(#[case] total: u64, #[case] limit: u32, #[case] expected: u64) {
        let request = PageRequest::new(1, limit).expect("valid request");
        assert_eq!(PageInfo::new(request, total).total_pages, expected);
    }

    #[rstest]
    fn empty_collection_yields_empty_first_page() {
        let page: Page<u32> = Page::new(Vec::new(), PageRequest::default(), 0);
        assert!(page.items.is_empty());
        assert_eq!(page.pagination.total_pages, 0);
        assert_eq!(page.pagination.current_page, 1);
    }

    #[rstest]
    fn surplus_items_are_truncated() {
        let request = PageRequest::new(1, 2).expect("valid request");
        let page = Page::new(vec![1, 2, 3], request, 3);
        assert_eq!(page.items, vec![1, 2]);
    }

    #[rstest]
    fn serializes_client_envelope() {
        let request = PageRequest::new(2, 2).expect("valid request");
        let page = Page::new(vec!["c", "d"], request, 5).map(str::to_owned);
        let value = serde_json::to_value(&page).expect("serialize page");
        assert_eq!(
            value,
            json!({
                "items": ["c", "d"],
                "pagination": {"total": 5, "totalPages": 3, "currentPage": 2, "limit": 2}
            })
        );
    }
}
