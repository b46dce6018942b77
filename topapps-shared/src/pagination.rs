/// Zero-based page/page-size pagination and the response envelope
///
/// Every listing takes a validated [`Pagination`] and returns a
/// [`Paginated`] envelope. Malformed input (negative page, zero or oversized
/// page size) is rejected when the `Pagination` is built, never clamped, so
/// `has_next` is always computed from the numbers the caller asked for.
///
/// # Example
///
/// ```
/// use topapps_shared::pagination::{Pagination, Paginated};
///
/// let pagination = Pagination::new(1, 20).unwrap();
/// assert_eq!(pagination.offset(), 20);
///
/// let page = Paginated::new(vec!["a", "b", "c", "d", "e"], pagination, 25);
/// assert!(!page.has_next);
/// assert_eq!(page.next_page(), None);
/// ```

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Page size the dashboard requests
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Largest page a single call may return
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, thiserror::Error)]
pub enum PaginationError {
    #[error("Invalid pagination: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    #[error("Page {page} with page size {page_size} is out of range")]
    OffsetOverflow { page: i64, page_size: i64 },

    /// Well-formed, but above what one call may return
    #[error("page_size {page_size} exceeds the service limit of {max} items per page")]
    PageSizeLimit { page_size: i64, max: i64 },
}

/// Raw pagination input, as received from a caller
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct PaginationParams {
    #[validate(range(min = 0, message = "page must be zero or greater"))]
    #[serde(default)]
    pub page: i64,

    #[validate(range(min = 1, message = "page_size must be greater than zero"))]
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Validated pagination window
///
/// Only constructible through [`Pagination::new`] or `TryFrom<PaginationParams>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    page: i64,
    page_size: i64,
}

impl Pagination {
    /// Validates `page >= 0` and `1 <= page_size <= MAX_PAGE_SIZE`
    pub fn new(page: i64, page_size: i64) -> Result<Self, PaginationError> {
        Self::try_from(PaginationParams { page, page_size })
    }

    /// First page at the default size
    pub fn first() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    /// Rows to skip: `page * page_size`
    pub fn offset(&self) -> i64 {
        // checked in try_from
        self.page * self.page_size
    }

    /// Rows to take
    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

impl TryFrom<PaginationParams> for Pagination {
    type Error = PaginationError;

    fn try_from(params: PaginationParams) -> Result<Self, Self::Error> {
        params.validate()?;

        if params.page_size > MAX_PAGE_SIZE {
            return Err(PaginationError::PageSizeLimit {
                page_size: params.page_size,
                max: MAX_PAGE_SIZE,
            });
        }

        if params.page.checked_mul(params.page_size).is_none() {
            return Err(PaginationError::OffsetOverflow {
                page: params.page,
                page_size: params.page_size,
            });
        }

        Ok(Self {
            page: params.page,
            page_size: params.page_size,
        })
    }
}

/// A page of results plus what the caller needs to ask for the next one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,

    /// Zero-based page index
    pub page: i64,

    pub page_size: i64,

    /// Size of the whole filtered population, not just this page
    pub total_count: i64,

    /// `(page + 1) * page_size < total_count`
    pub has_next: bool,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, pagination: Pagination, total_count: i64) -> Self {
        to_paginated_response(items, pagination.page, pagination.page_size, total_count)
    }

    /// Page index to request next, if any
    pub fn next_page(&self) -> Option<i64> {
        self.has_next.then_some(self.page + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_count: self.total_count,
            has_next: self.has_next,
        }
    }
}

/// Wraps a page of items in the response envelope
///
/// Pure; works for empty pages and an empty population.
pub fn to_paginated_response<T>(
    items: Vec<T>,
    page: i64,
    page_size: i64,
    total_count: i64,
) -> Paginated<T> {
    let has_next = (page.saturating_add(1)).saturating_mul(page_size) < total_count;

    Paginated {
        items,
        page,
        page_size,
        total_count,
        has_next,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_next_matches_formula() {
        for page in 0..6i64 {
            for page_size in 1..8i64 {
                for total_count in 0..40i64 {
                    let envelope = to_paginated_response(Vec::<()>::new(), page, page_size, total_count);
                    assert_eq!(
                        envelope.has_next,
                        (page + 1) * page_size < total_count,
                        "page={page} page_size={page_size} total={total_count}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_twenty_five_items_two_pages() {
        let first = Paginated::new(vec![0; 20], Pagination::new(0, 20).unwrap(), 25);
        assert!(first.has_next);
        assert_eq!(first.next_page(), Some(1));

        let second = Paginated::new(vec![0; 5], Pagination::new(1, 20).unwrap(), 25);
        assert!(!second.has_next);
        assert_eq!(second.next_page(), None);
    }

    #[test]
    fn test_empty_population() {
        let envelope = Paginated::new(Vec::<u8>::new(), Pagination::first(), 0);
        assert!(envelope.is_empty());
        assert_eq!(envelope.total_count, 0);
        assert!(!envelope.has_next);
    }

    #[test]
    fn test_exact_multiple_has_no_next() {
        let envelope = Paginated::new(vec![0; 20], Pagination::new(1, 20).unwrap(), 40);
        assert!(!envelope.has_next);
    }

    #[test]
    fn test_rejects_negative_page() {
        assert!(matches!(Pagination::new(-1, 20), Err(PaginationError::Invalid(_))));
    }

    #[test]
    fn test_rejects_bad_page_size() {
        assert!(Pagination::new(0, 0).is_err());
        assert!(Pagination::new(0, -5).is_err());
        assert!(Pagination::new(0, MAX_PAGE_SIZE).is_ok());
    }

    #[test]
    fn test_page_size_above_limit_is_a_service_cap() {
        let err = Pagination::new(0, MAX_PAGE_SIZE + 1).unwrap_err();
        assert!(matches!(
            err,
            PaginationError::PageSizeLimit { page_size: 101, max: MAX_PAGE_SIZE }
        ));
        assert_eq!(
            err.to_string(),
            "page_size 101 exceeds the service limit of 100 items per page"
        );
    }

    #[test]
    fn test_rejects_offset_overflow() {
        let result = Pagination::new(i64::MAX, 2);
        assert!(matches!(result, Err(PaginationError::OffsetOverflow { .. })));
    }

    #[test]
    fn test_offset_and_limit() {
        let pagination = Pagination::new(3, 25).unwrap();
        assert_eq!(pagination.offset(), 75);
        assert_eq!(pagination.limit(), 25);
    }

    #[test]
    fn test_params_defaults_from_json() {
        let params: PaginationParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.page, 0);
        assert_eq!(params.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_map_keeps_envelope() {
        let envelope = Paginated::new(vec![1, 2], Pagination::new(0, 2).unwrap(), 3).map(|n| n * 10);
        assert_eq!(envelope.items, vec![10, 20]);
        assert!(envelope.has_next);
    }
}
