//! Pagination state for list screens.
//!
//! [`Pagination`] tracks `{page, limit, total}` for one query and derives
//! everything a table footer needs: page count, offsets, neighbouring pages
//! and a "`start`-`end` of `total`" summary.
//!
//! Invariants, upheld by every method:
//! - `1 <= limit <= max_limit`
//! - `1 <= page <= total_pages()`
//! - `total_pages() >= 1`, even for an empty result set
//!
//! Out-of-range navigation is ignored rather than clamped, so a stale
//! "go to page 7" click after the result set shrank simply does nothing.
//!
//! # Example
//!
//! ```
//! use bloodbank_core::Pagination;
//!
//! let mut p = Pagination::new(10, 25);
//! assert_eq!(p.total_pages(), 3);
//! assert!(p.go_to_page(3));
//! assert!(!p.next_page());
//! assert_eq!(p.info().to_string(), "21-25 of 25");
//! ```

use core::fmt;
use core::ops::Range;

use serde::{Deserialize, Serialize};

use crate::envelope::PaginationMeta;

/// Page size used when a screen doesn't ask for one.
pub const DEFAULT_LIMIT: u64 = 10;

/// Upper bound accepted by [`Pagination::change_limit`] unless overridden.
pub const DEFAULT_MAX_LIMIT: u64 = 100;

/// Page/limit/total state for one list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredPagination")]
pub struct Pagination {
    page: u64,
    limit: u64,
    total: u64,
    max_limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
            total: 0,
            max_limit: DEFAULT_MAX_LIMIT,
        }
    }
}

/// Decoded form of [`Pagination`], normalised on the way in.
#[derive(Deserialize)]
struct StoredPagination {
    page: u64,
    limit: u64,
    total: u64,
    #[serde(default = "default_max_limit")]
    max_limit: u64,
}

fn default_max_limit() -> u64 {
    DEFAULT_MAX_LIMIT
}

impl From<StoredPagination> for Pagination {
    fn from(stored: StoredPagination) -> Self {
        let mut p = Self {
            total: stored.total,
            ..Self::with_limits(stored.limit, stored.max_limit)
        };
        p.page = stored.page.clamp(1, p.total_pages());
        p
    }
}

impl Pagination {
    /// Start on page 1 with the given page size (clamped) and total.
    pub fn new(limit: u64, total: u64) -> Self {
        Self {
            total,
            ..Self::with_limits(limit, DEFAULT_MAX_LIMIT)
        }
    }

    /// Empty result set whose page size is bounded by `max_limit` rather than
    /// [`DEFAULT_MAX_LIMIT`].
    pub fn with_limits(limit: u64, max_limit: u64) -> Self {
        let max_limit = max_limit.max(1);
        Self {
            page: 1,
            limit: limit.clamp(1, max_limit),
            total: 0,
            max_limit,
        }
    }

    /// Override the largest page size `change_limit` accepts.
    pub fn with_max_limit(mut self, max_limit: u64) -> Self {
        self.max_limit = max_limit.max(1);
        self.limit = self.limit.clamp(1, self.max_limit);
        self.page = self.page.min(self.total_pages());
        self
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn max_limit(&self) -> u64 {
        self.max_limit
    }

    /// `ceil(total / limit)`, never less than 1.
    pub fn total_pages(&self) -> u64 {
        if self.total == 0 {
            1
        } else {
            self.total.div_ceil(self.limit)
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Jump to `page`. Returns `false` (and changes nothing) when out of range.
    pub fn go_to_page(&mut self, page: u64) -> bool {
        if page < 1 || page > self.total_pages() {
            tracing::trace!(page, total_pages = self.total_pages(), "ignoring out-of-range page");
            return false;
        }
        self.page = page;
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.page + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page <= 1 {
            return false;
        }
        self.go_to_page(self.page - 1)
    }

    /// Change the page size, clamped to `[1, max_limit]`. Always resets to page 1.
    pub fn change_limit(&mut self, limit: u64) {
        self.limit = limit.clamp(1, self.max_limit);
        self.page = 1;
    }

    /// Record a new total (e.g. after a delete), pulling `page` back into range.
    pub fn set_total(&mut self, total: u64) {
        self.total = total;
        self.page = self.page.clamp(1, self.total_pages());
    }

    /// Adopt the pagination block of a server response.
    pub fn apply_meta(&mut self, meta: &PaginationMeta) {
        self.limit = meta.limit.clamp(1, self.max_limit);
        self.total = meta.total;
        self.page = meta.current.clamp(1, self.total_pages());
    }

    /// Number of items before the current page.
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.limit
    }

    /// Index range of the current page within the full result set.
    pub fn slice_bounds(&self) -> Range<u64> {
        let start = self.offset().min(self.total);
        let end = (self.offset() + self.limit).min(self.total);
        start..end
    }

    /// A window of at most `max_visible` page numbers centred on the current page.
    ///
    /// The window is shifted (not shrunk) at either edge, so it holds exactly
    /// `min(total_pages, max_visible)` entries.
    pub fn page_numbers(&self, max_visible: u64) -> Vec<u64> {
        let total_pages = self.total_pages();
        let count = total_pages.min(max_visible);
        if count == 0 {
            return Vec::new();
        }

        let mut start = self.page.saturating_sub(count / 2).max(1);
        let mut end = start + count - 1;
        if end > total_pages {
            end = total_pages;
            start = end + 1 - count;
        }

        (start..=end).collect()
    }

    pub fn info(&self) -> PaginationInfo {
        let bounds = self.slice_bounds();
        if self.total == 0 {
            return PaginationInfo {
                start: 0,
                end: 0,
                total: 0,
            };
        }
        PaginationInfo {
            start: bounds.start + 1,
            end: bounds.end,
            total: self.total,
        }
    }
}

/// 1-indexed bounds of the visible rows; renders as "`start`-`end` of `total`".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationInfo {
    pub start: u64,
    pub end: u64,
    pub total: u64,
}

impl fmt::Display for PaginationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total == 0 {
            f.write_str("0 results")
        } else {
            write!(f, "{}-{} of {}", self.start, self.end, self.total)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
