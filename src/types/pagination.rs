//! Pagination types for list endpoints.

use axum::{
    http::{HeaderMap, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PAGINATION_HEADER};
use crate::errors::{AppError, AppResult};

/// Pagination query parameters shared by every paged endpoint
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// 1-based page number
    #[serde(default = "default_page")]
    pub page_number: u64,
    /// Items per page, capped at 50
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

pub(super) fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

pub(super) fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl PaginationParams {
    pub fn new(page_number: u64, page_size: u64) -> Self {
        Self {
            page_number,
            page_size,
        }
    }

    /// Reject page numbers or sizes below one.
    pub fn validate(&self) -> AppResult<()> {
        if self.page_number < 1 {
            return Err(AppError::validation("pageNumber deve ser maior que zero"));
        }
        if self.page_size < 1 {
            return Err(AppError::validation("pageSize deve ser maior que zero"));
        }
        if self.offset().is_none() {
            return Err(AppError::validation("pageNumber fora do intervalo permitido"));
        }
        Ok(())
    }

    /// Rows skipped before this page, if it fits a signed 64-bit offset.
    pub fn offset(&self) -> Option<u64> {
        self.page_index()
            .checked_mul(self.limit())
            .filter(|offset| i64::try_from(*offset).is_ok())
    }

    /// Page size capped at `MAX_PAGE_SIZE`
    pub fn limit(&self) -> u64 {
        self.page_size.min(MAX_PAGE_SIZE)
    }

    /// Zero-based page index as expected by the SeaORM paginator
    pub fn page_index(&self) -> u64 {
        self.page_number.saturating_sub(1)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE)
    }
}

/// Metadata sent in the `X-Pagination` header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaginationMeta {
    /// Items in the current page
    pub count: u64,
    pub page_size: u64,
    pub page_count: u64,
    pub total_item_count: u64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

/// One page of items plus its metadata
#[derive(Debug, Clone)]
pub struct PagedList<T> {
    pub items: Vec<T>,
    pub meta: PaginationMeta,
}

impl<T> PagedList<T> {
    pub fn new(items: Vec<T>, page_number: u64, page_size: u64, total: u64) -> Self {
        let page_count = if page_size > 0 {
            total.div_ceil(page_size)
        } else {
            0
        };

        let meta = PaginationMeta {
            count: items.len() as u64,
            page_size,
            page_count,
            total_item_count: total,
            has_next_page: page_number < page_count,
            has_previous_page: page_number > 1,
        };

        Self { items, meta }
    }

    /// Convert the items, keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedList<U> {
        PagedList {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

impl<T: Serialize> IntoResponse for PagedList<T> {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        let header = HeaderName::from_bytes(PAGINATION_HEADER.as_bytes()).ok().zip(
            serde_json::to_string(&self.meta)
                .ok()
                .and_then(|meta| HeaderValue::from_str(&meta).ok()),
        );
        match header {
            Some((name, value)) => {
                headers.insert(name, value);
            }
            None => tracing::warn!(header = PAGINATION_HEADER, "Failed to encode pagination header"),
        }

        (headers, Json(self.items)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_for_middle_page() {
        let page = PagedList::new(vec![1, 2, 3], 2, 3, 8);
        assert_eq!(page.meta.count, 3);
        assert_eq!(page.meta.page_count, 3);
        assert!(page.meta.has_next_page);
        assert!(page.meta.has_previous_page);
    }

    #[test]
    fn test_meta_for_last_partial_page() {
        let page = PagedList::new(vec![7, 8], 3, 3, 8);
        assert_eq!(page.meta.count, 2);
        assert!(!page.meta.has_next_page);
    }

    #[test]
    fn test_meta_for_empty_set() {
        let page: PagedList<i32> = PagedList::new(vec![], 1, 10, 0);
        assert_eq!(page.meta.page_count, 0);
        assert!(!page.meta.has_next_page);
        assert!(!page.meta.has_previous_page);
    }

    #[test]
    fn test_limit_is_capped() {
        assert_eq!(PaginationParams::new(1, 500).limit(), MAX_PAGE_SIZE);
        assert_eq!(PaginationParams::new(1, 5).limit(), 5);
    }

    #[test]
    fn test_zero_page_rejected() {
        assert!(PaginationParams::new(0, 10).validate().is_err());
        assert!(PaginationParams::new(1, 0).validate().is_err());
        assert!(PaginationParams::default().validate().is_ok());
    }

    #[test]
    fn test_header_name_matches_constant() {
        let response = PagedList::new(vec![1], 1, 10, 1).into_response();
        assert!(response.headers().contains_key(PAGINATION_HEADER));
    }

    #[test]
    fn test_offset_must_fit_i64() {
        assert_eq!(PaginationParams::new(3, 10).offset(), Some(20));

        let huge = PaginationParams::new(9_223_372_036_854_775_808, 2);
        assert_eq!(huge.offset(), None);
        assert!(matches!(huge.validate(), Err(AppError::Validation(_))));

        let overflow = PaginationParams::new(u64::MAX, 50);
        assert!(overflow.validate().is_err());
    }

    #[test]
    fn test_header_uses_pascal_case() {
        let meta = PagedList::new(vec!["a"], 1, 10, 1).meta;
        let json = serde_json::to_value(meta).unwrap();
        assert_eq!(json["TotalItemCount"], 1);
        assert_eq!(json["HasPreviousPage"], false);
    }

    #[test]
    fn test_response_carries_header() {
        let response = PagedList::new(vec![1, 2], 1, 2, 5).into_response();
        let header = response.headers().get(PAGINATION_HEADER).unwrap();
        let meta: PaginationMeta = serde_json::from_str(header.to_str().unwrap()).unwrap();
        assert_eq!(meta.total_item_count, 5);
        assert_eq!(meta.page_count, 3);
    }
}
