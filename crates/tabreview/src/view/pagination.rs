//! Page windowing over the filtered view.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// One entry in a page-navigation strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageLink {
    Page { number: usize, current: bool },
    Ellipsis,
}

/// Current page pointer and page size. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PagerFields")]
pub struct Pager {
    page: usize,
    page_size: usize,
}

#[derive(Deserialize)]
struct PagerFields {
    page: usize,
    page_size: usize,
}

impl TryFrom<PagerFields> for Pager {
    type Error = String;

    fn try_from(fields: PagerFields) -> Result<Self, Self::Error> {
        if fields.page == 0 || fields.page_size == 0 {
            return Err(format!(
                "page and page_size must be at least 1, got page {} and page_size {}",
                fields.page, fields.page_size
            ));
        }
        Ok(Self {
            page: fields.page,
            page_size: fields.page_size,
        })
    }
}

impl Pager {
    /// Create a pager on page 1. A zero page size is raised to 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Current page number.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Change the page size and return to page 1.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    /// Return to page 1.
    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Total pages for a view of `len` rows; never less than 1.
    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size).max(1)
    }

    /// Move to page `page`, clamped into `[1, total_pages]`. Returns the page landed on.
    pub fn go_to(&mut self, page: usize, len: usize) -> usize {
        let total = self.total_pages(len);
        let clamped = page.clamp(1, total);
        if clamped != page {
            debug!(requested = page, clamped, total, "clamped page number");
        }
        self.page = clamped;
        clamped
    }

    /// Advance one page if possible.
    pub fn next(&mut self, len: usize) -> usize {
        self.go_to(self.page.saturating_add(1), len)
    }

    /// Go back one page if possible.
    pub fn prev(&mut self, len: usize) -> usize {
        self.go_to(self.page.saturating_sub(1), len)
    }

    pub fn has_next(&self, len: usize) -> bool {
        self.page < self.total_pages(len)
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Index range of the current page within a view of `len` rows.
    pub fn window(&self, len: usize) -> Range<usize> {
        let start = (self.page - 1).saturating_mul(self.page_size).min(len);
        let end = start.saturating_add(self.page_size).min(len);
        start..end
    }

    /// The slice of `view` on the current page.
    pub fn slice<'a, T>(&self, view: &'a [T]) -> &'a [T] {
        &view[self.window(view.len())]
    }

    /// Navigation strip: first page, a centered run of up to `max_buttons`
    /// pages, and last page, with ellipses marking gaps.
    pub fn page_links(&self, len: usize, max_buttons: usize) -> Vec<PageLink> {
        let max_buttons = max_buttons.max(1);
        let total = self.total_pages(len);
        let current = self.page.min(total);

        let mut start = current.saturating_sub(max_buttons / 2).max(1);
        let end = (start + max_buttons - 1).min(total);
        if end - start < max_buttons - 1 {
            start = (end + 1).saturating_sub(max_buttons).max(1);
        }

        let link = |number: usize| PageLink::Page {
            number,
            current: number == current,
        };

        let mut links = Vec::new();
        if start > 1 {
            links.push(link(1));
            if start > 2 {
                links.push(PageLink::Ellipsis);
            }
        }
        links.extend((start..=end).map(link));
        if end < total {
            if end < total - 1 {
                links.push(PageLink::Ellipsis);
            }
            links.push(link(total));
        }
        links
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
