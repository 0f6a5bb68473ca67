//! Pagination and filtering query parameters.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::domain::entities::PaymentStatus;

const DEFAULT_PAGE_SIZE: u32 = 25;
const PAGE_SIZE_RANGE: std::ops::RangeInclusive<u32> = 10..=100;

/// Pagination query parameters.
///
/// Uses `serde_with` to parse page numbers from query strings as integers,
/// which also keeps them working under `#[serde(flatten)]`.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl PaginationParams {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Validates pagination parameters and converts to database offset/limit.
    ///
    /// # Defaults
    ///
    /// - `page`: 1
    /// - `page_size`: 25
    ///
    /// # Validation
    ///
    /// - Page must be > 0
    /// - Page size must be between 10 and 100
    ///
    /// # Returns
    ///
    /// `(offset, limit)` tuple for SQL queries.
    pub fn validate_and_get_offset_limit(&self) -> Result<(i64, i64), String> {
        let page = self.page();
        let page_size = self.page_size();

        if page == 0 {
            return Err("Page must be greater than 0".to_string());
        }

        if !PAGE_SIZE_RANGE.contains(&page_size) {
            return Err(format!(
                "Page size must be between {} and {}",
                PAGE_SIZE_RANGE.start(),
                PAGE_SIZE_RANGE.end()
            ));
        }

        let offset = (i64::from(page) - 1) * i64::from(page_size);
        let limit = i64::from(page_size);

        Ok((offset, limit))
    }
}

/// Query parameters for the admin payment queue.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct PaymentListParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,

    /// Defaults to `pending_verification`.
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub status: Option<PaymentStatus>,
}

/// Pagination metadata for responses.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: i64,
    pub total_pages: u32,
}

impl PaginationMeta {
    pub fn new(params: &PaginationParams, total_items: i64) -> Self {
        let page_size = params.page_size();
        let total_pages = (total_items.max(0) as u64).div_ceil(u64::from(page_size.max(1)));

        Self {
            page: params.page(),
            page_size,
            total_items,
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
        }
    }
}

/// A page of items with its pagination metadata.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub pagination: PaginationMeta,
    pub items: Vec<T>,
}
