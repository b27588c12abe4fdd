//! Paging arithmetic: page windows and display ranges.

use serde::Serialize;

use crate::error::{Error, Result};

/// Offsets applied by a backend when fetching a page of items.
///
/// `pre_skip` is a fixed backend-imposed offset, applied before the
/// page-derived `skip`. A backend's count must already have `pre_skip`
/// subtracted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PagingWindow {
    pub pre_skip: u64,
    pub skip: u64,
    pub take: u64,
}

/// The computed paging state for one rendered list.
///
/// `from` and `to` are 1-based inclusive item indices for display.
/// `show_paging` is decided by the caller; the calculator itself never
/// hides single-page results, that policy belongs to the rendering layer.
#[derive(Debug, Clone, Serialize)]
pub struct Paging {
    pub page: u64,
    pub page_size: u64,
    pub from: u64,
    pub to: u64,
    pub total: u64,
    pub show_paging: bool,
}

impl Paging {
    /// Total number of pages: `ceil(total / page_size)`.
    pub fn pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(self.page_size)
    }

    /// The window a backend should apply to serve this page.
    pub fn window(&self, pre_skip: u64) -> PagingWindow {
        PagingWindow {
            pre_skip,
            skip: (self.page - 1) * self.page_size,
            take: self.page_size,
        }
    }
}

/// Compute the paging state from a total count, a page size, and the
/// requested page number.
///
/// The requested page is clamped to `[1, max(pages, 1)]`, so any page
/// number from the query string yields a valid window. A zero page size
/// fails with [`Error::InvalidConfiguration`]; every other input, including
/// `total == 0`, computes without error.
pub fn compute_paging(total: u64, page_size: u64, requested_page: u64) -> Result<Paging> {
    if page_size == 0 {
        return Err(Error::InvalidConfiguration(
            "page_size must be > 0".to_string(),
        ));
    }

    let pages = total.div_ceil(page_size);
    let page = requested_page.clamp(1, pages.max(1));
    let from = (page - 1) * page_size + 1;
    let to = from.saturating_add(page_size - 1).min(total);

    Ok(Paging {
        page,
        page_size,
        from,
        to,
        total,
        show_paging: pages > 1,
    })
}
