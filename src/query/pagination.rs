// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Page-number pagination over any countable, sliceable collection.
//!
//! Out-of-range page numbers are clamped rather than rejected, so paging a
//! valid collection never fails. The only error is a zero page size, which is
//! a caller bug.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Pagination errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    #[error("page size must be greater than zero")]
    ZeroPageSize,
}

/// A collection that can be counted and sliced.
///
/// Implementations must return the same ordering from `count` and `slice`
/// within one pagination call.
pub trait Paginate {
    type Item;

    fn count(&self) -> usize;

    /// Items in `[offset, offset + limit)`; shorter at the end of the collection.
    fn slice(&self, offset: usize, limit: usize) -> Vec<Self::Item>;
}

impl<T: Clone> Paginate for [T] {
    type Item = T;

    fn count(&self) -> usize {
        self.len()
    }

    fn slice(&self, offset: usize, limit: usize) -> Vec<T> {
        self.iter().skip(offset).take(limit).cloned().collect()
    }
}

impl<T: Clone> Paginate for Vec<T> {
    type Item = T;

    fn count(&self) -> usize {
        self.len()
    }

    fn slice(&self, offset: usize, limit: usize) -> Vec<T> {
        self.as_slice().slice(offset, limit)
    }
}

/// One page of results plus navigation metadata.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Page<T> {
    /// Number of pages (at least 1)
    pub total_pages: usize,
    /// Page size used to cut this page
    pub page_size: usize,
    /// Number of items across all pages
    pub total_items: usize,
    /// 1-based page number actually returned
    pub current_page: usize,
    pub has_next: bool,
    pub has_prev: bool,
    pub results: Vec<T>,
}

/// Cut page `requested_page` (1-based) out of `collection`.
///
/// Pages below 1 become 1; pages past the end become the last page. An empty
/// collection has exactly one, empty, page.
pub fn paginate<C>(
    collection: &C,
    page_size: usize,
    requested_page: i64,
) -> Result<Page<C::Item>, PaginationError>
where
    C: Paginate + ?Sized,
{
    if page_size == 0 {
        return Err(PaginationError::ZeroPageSize);
    }

    let total_items = collection.count();
    let total_pages = total_items.div_ceil(page_size).max(1);

    let current_page = usize::try_from(requested_page)
        .unwrap_or(1)
        .clamp(1, total_pages);

    let offset = (current_page - 1) * page_size;
    let results = collection.slice(offset, page_size);

    Ok(Page {
        total_pages,
        page_size,
        total_items,
        current_page,
        has_next: current_page < total_pages,
        has_prev: current_page > 1,
        results,
    })
}

/// Raw paging parameters from a query string.
///
/// Parsed leniently: a page that is not an integer means page 1, a page size
/// that is not an integer means the configured default.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number
    pub page: Option<String>,
    /// Results per page (defaults to the server setting)
    pub page_size: Option<String>,
}

impl PageQuery {
    pub fn requested_page(&self) -> i64 {
        self.page.as_deref().map_or(1, parse_page)
    }

    pub fn requested_page_size(&self) -> Option<usize> {
        self.page_size
            .as_deref()
            .and_then(|raw| raw.trim().parse().ok())
    }
}

/// Integers too large for `i64` saturate so the clamp still applies; anything
/// else that fails to parse means page 1.
fn parse_page(raw: &str) -> i64 {
    let raw = raw.trim();
    if let Ok(page) = raw.parse() {
        return page;
    }

    let (negative, digits) = match raw.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return 1;
    }
    if negative {
        i64::MIN
    } else {
        i64::MAX
    }
}

/// Pagination with the process-wide default page size.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    page_size: usize,
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self { page_size }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Paginate with the default page size.
    pub fn paginate<C>(&self, collection: &C, requested_page: i64) -> Result<Page<C::Item>, PaginationError>
    where
        C: Paginate + ?Sized,
    {
        paginate(collection, self.page_size, requested_page)
    }

    /// Paginate with a caller-chosen page size, falling back to the default.
    pub fn paginate_with_size<C>(
        &self,
        collection: &C,
        page_size: Option<usize>,
        requested_page: i64,
    ) -> Result<Page<C::Item>, PaginationError>
    where
        C: Paginate + ?Sized,
    {
        paginate(collection, page_size.unwrap_or(self.page_size), requested_page)
    }

    /// Paginate according to query-string parameters.
    pub fn paginate_query<C>(&self, collection: &C, query: &PageQuery) -> Result<Page<C::Item>, PaginationError>
    where
        C: Paginate + ?Sized,
    {
        self.paginate_with_size(collection, query.requested_page_size(), query.requested_page())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<usize> {
        (1..=n).collect()
    }

    #[test]
    fn page_zero_clamps_to_first_page() {
        let page = paginate(&items(95), 20, 0).unwrap();
        assert_eq!(page.current_page, 1);
        assert_eq!(page.total_pages, 5);
        assert!(page.has_next);
        assert!(!page.has_prev);
        assert_eq!(page.results, (1..=20).collect::<Vec<_>>());
    }

    #[test]
    fn page_past_the_end_clamps_to_last_page() {
        let page = paginate(&items(95), 20, 999).unwrap();
        assert_eq!(page.current_page, 5);
        assert!(!page.has_next);
        assert!(page.has_prev);
        assert_eq!(page.results, (81..=95).collect::<Vec<_>>());
    }

    #[test]
    fn negative_page_clamps_to_first_page() {
        let page = paginate(&items(95), 20, -3).unwrap();
        assert_eq!(page.current_page, 1);
    }

    #[test]
    fn empty_collection_has_one_empty_page() {
        let page = paginate(&Vec::<u8>::new(), 20, 1).unwrap();
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.total_items, 0);
        assert_eq!(page.current_page, 1);
        assert!(page.results.is_empty());
        assert!(!page.has_next);
        assert!(!page.has_prev);
    }

    #[test]
    fn middle_page_has_both_neighbours() {
        let page = paginate(&items(95), 20, 3).unwrap();
        assert_eq!(page.results, (41..=60).collect::<Vec<_>>());
        assert!(page.has_next);
        assert!(page.has_prev);
        assert_eq!(page.page_size, 20);
        assert_eq!(page.total_items, 95);
    }

    #[test]
    fn exact_multiple_does_not_add_a_page() {
        let page = paginate(&items(40), 20, 2).unwrap();
        assert_eq!(page.total_pages, 2);
        assert!(!page.has_next);
    }

    #[test]
    fn works_over_slices() {
        let data = ["a", "b", "c"];
        let page = paginate(&data[..], 2, 2).unwrap();
        assert_eq!(page.results, vec!["c"]);
    }

    #[test]
    fn zero_page_size_is_a_contract_violation() {
        assert_eq!(
            paginate(&items(5), 0, 1).unwrap_err(),
            PaginationError::ZeroPageSize
        );
    }

    #[test]
    fn page_query_parses_leniently() {
        let query = PageQuery {
            page: Some("abc".to_string()),
            page_size: Some("ten".to_string()),
        };
        assert_eq!(query.requested_page(), 1);
        assert_eq!(query.requested_page_size(), None);

        let query = PageQuery {
            page: Some(" 3 ".to_string()),
            page_size: Some("5".to_string()),
        };
        assert_eq!(query.requested_page(), 3);
        assert_eq!(query.requested_page_size(), Some(5));

        assert_eq!(PageQuery::default().requested_page(), 1);
    }

    #[test]
    fn overflowing_page_numbers_still_clamp() {
        let paginator = Paginator::new(20);
        let data = items(95);

        let query = PageQuery {
            page: Some("99999999999999999999".to_string()),
            page_size: None,
        };
        assert_eq!(query.requested_page(), i64::MAX);
        let page = paginator.paginate_query(&data, &query).unwrap();
        assert_eq!(page.current_page, 5);
        assert_eq!(page.results, (81..=95).collect::<Vec<_>>());

        let query = PageQuery {
            page: Some("-99999999999999999999".to_string()),
            page_size: None,
        };
        let page = paginator.paginate_query(&data, &query).unwrap();
        assert_eq!(page.current_page, 1);

        let query = PageQuery {
            page: Some("9999x".to_string()),
            page_size: None,
        };
        assert_eq!(query.requested_page(), 1);
    }

    #[test]
    fn paginator_uses_default_and_overrides() {
        let paginator = Paginator::new(10);
        let data = items(25);

        let page = paginator.paginate(&data, 3).unwrap();
        assert_eq!(page.results, (21..=25).collect::<Vec<_>>());

        let page = paginator.paginate_with_size(&data, Some(5), 2).unwrap();
        assert_eq!(page.results, (6..=10).collect::<Vec<_>>());

        let query = PageQuery {
            page: Some("2".to_string()),
            page_size: None,
        };
        let page = paginator.paginate_query(&data, &query).unwrap();
        assert_eq!(page.current_page, 2);
        assert_eq!(page.page_size, 10);
    }
}
