//! Pagination utilities shared by list endpoints.
//!
//! `PageRequest` is what the caller asked for, `PageWindow` is the page that
//! is actually served once the total number of matching rows is known.

use serde::Serialize;

/// Rows per page on every list endpoint.
pub const PAGE_SIZE: u64 = 5;

/// Requested page, parsed leniently from the `page` query parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageRequest {
    /// 1-based page number
    Number(u64),
    /// the final page, whatever its number
    Last,
}

impl PageRequest {
    /// `None`, blanks, garbage and `0` all mean page 1.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("last") => PageRequest::Last,
            Some(s) => match s.parse::<u64>() {
                Ok(n) if n > 0 => PageRequest::Number(n),
                _ => PageRequest::Number(1),
            },
            None => PageRequest::Number(1),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self { PageRequest::Number(1) }
}

/// Resolved page, always inside `1..=total_pages`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub number: u64,
    pub per_page: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl PageWindow {
    /// Clamp the request to the pages that exist. An empty result still has one (empty) page.
    pub fn resolve(requested: PageRequest, per_page: u64, total_items: u64) -> Self {
        let per_page = per_page.max(1);
        let total_pages = total_items.div_ceil(per_page).max(1);
        let number = match requested {
            PageRequest::Number(n) => n.clamp(1, total_pages),
            PageRequest::Last => total_pages,
        };
        Self { number, per_page, total_items, total_pages }
    }

    /// 0-based index for the ORM paginator
    pub fn index(&self) -> u64 { self.number - 1 }

    pub fn is_paginated(&self) -> bool { self.total_items > self.per_page }

    pub fn has_next(&self) -> bool { self.number < self.total_pages }

    pub fn has_previous(&self) -> bool { self.number > 1 }
}
