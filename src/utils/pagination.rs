use serde::{Deserialize, Serialize};

/// Default page size for the players listing
pub const DEFAULT_PLAYER_PAGE_SIZE: i64 = 25;

/// Default page size for the games listing
pub const DEFAULT_GAME_PAGE_SIZE: i64 = 50;

/// Largest page size a caller can ask for
pub const MAX_PAGE_SIZE: i64 = 500;

/// A normalized, always-valid page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    /// Build a page request from raw text parameters.
    /// Missing, non-numeric, zero or negative values fall back to page 1 and
    /// `default_size`.
    pub fn from_params(page: Option<&str>, page_size: Option<&str>, default_size: i64) -> Self {
        let page = parse_positive(page).unwrap_or(1);
        let page_size = parse_positive(page_size)
            .unwrap_or(default_size)
            .min(MAX_PAGE_SIZE);

        Self { page, page_size }
    }

    /// Number of rows to skip. Never negative.
    pub fn offset(&self) -> i64 {
        (self.page - 1).max(0).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

fn parse_positive(value: Option<&str>) -> Option<i64> {
    value
        .map(str::trim)
        .and_then(|v| v.parse::<i64>().ok())
        .filter(|v| *v > 0)
}

/// Number of pages needed to show `total` rows, 0 when there are no rows
pub fn total_pages(total: i64, page_size: i64) -> i64 {
    if total <= 0 || page_size <= 0 {
        return 0;
    }
    (total + page_size - 1) / page_size
}

/// One page of records plus the count of every record matching the filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

impl<T> Page<T> {
    pub fn new(records: Vec<T>, total: i64, request: PageRequest) -> Self {
        Self {
            records,
            total,
            page: request.page,
            page_size: request.page_size,
        }
    }

    pub fn total_pages(&self) -> i64 {
        total_pages(self.total, self.page_size)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            records: self.records.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
        }
    }
}
