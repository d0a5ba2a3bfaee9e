//! API Response types
//!
//! Response envelopes returned by the accounting backend.

use serde::{Deserialize, Serialize};

/// Pagination metadata
///
/// ```json
/// { "page": 1, "limit": 10, "total": 42, "pages": 5 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    /// Current page number (1-based)
    pub page: u32,
    /// Items per page
    pub limit: u32,
    /// Total number of matching items, across all pages
    pub total: u64,
    /// Total number of pages
    pub pages: u32,
}

impl PaginationMeta {
    /// Create pagination metadata, deriving `pages` from `total` and `limit`.
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        Self {
            page,
            limit,
            total,
            pages: Self::pages_for(total, limit),
        }
    }

    /// `ceil(total / limit)`. An empty result has zero pages.
    pub fn pages_for(total: u64, limit: u32) -> u32 {
        if limit == 0 {
            return 0;
        }
        let pages = total.div_ceil(u64::from(limit));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Whether `pages` agrees with `total` and `limit`.
    pub fn is_consistent(&self) -> bool {
        self.pages == Self::pages_for(self.total, self.limit)
    }
}

/// Paginated list envelope
///
/// `data` is in server sort order and holds at most `limit` rows. An empty
/// `data` is a valid page (no matches, or a page past the end).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageEnvelope<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PageEnvelope<T> {
    pub fn new(data: Vec<T>, page: u32, limit: u32, total: u64) -> Self {
        Self {
            success: true,
            data,
            pagination: PaginationMeta::new(page, limit, total),
        }
    }

    /// No rows matched the query at all.
    pub fn is_empty(&self) -> bool {
        self.pagination.total == 0
    }

    /// Checks the envelope invariants: row count within `limit`, and `pages`
    /// derived from `total`.
    pub fn is_consistent(&self) -> bool {
        self.data.len() <= self.pagination.limit as usize && self.pagination.is_consistent()
    }
}

/// Single-record response: `{ success, data }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

/// Plain message response: `{ message }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: String,
}
