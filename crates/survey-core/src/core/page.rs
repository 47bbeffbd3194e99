// crates/survey-core/src/core/page.rs
// ============================================================================
// Module: Survey Pagination
// Description: Page windows and pagination metadata for list endpoints.
// Purpose: Compute offset windows and derived pagination fields consistently.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! List endpoints take a 1-based page number and a page size and answer with
//! a [`Pagination`] object. `totalPages` is `ceil(total / limit)`,
//! `hasNext` is `page * limit < total`, and `hasPrev` is `page > 1`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default page size when none is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Largest accepted page size.
pub const MAX_PAGE_SIZE: u32 = 100;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Requested page window.
///
/// # Invariants
/// - `page >= 1` and `1 <= limit <= MAX_PAGE_SIZE` when built by validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Creates a page window.
    #[must_use]
    pub const fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }

    /// Returns the zero-based row offset of the window.
    #[must_use]
    pub fn offset(self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Pagination metadata returned alongside list data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Current page.
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// Total matching rows.
    pub total: u64,
    /// Number of pages.
    pub total_pages: u64,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_prev: bool,
}

impl Pagination {
    /// Derives pagination metadata for a window over `total` rows.
    #[must_use]
    pub fn new(request: PageRequest, total: u64) -> Self {
        let limit = u64::from(request.limit.max(1));
        Self {
            page: request.page,
            limit: request.limit,
            total,
            total_pages: total.div_ceil(limit),
            has_next: u64::from(request.page) * limit < total,
            has_prev: request.page > 1,
        }
    }
}

/// A page of records with metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    /// Records in the window.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Builds a page from a window of records and the total count.
    #[must_use]
    pub fn new(data: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            data,
            pagination: Pagination::new(request, total),
        }
    }

    /// Returns an empty page for the given window.
    #[must_use]
    pub fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), request, 0)
    }

    /// Maps every record, keeping pagination intact.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}
