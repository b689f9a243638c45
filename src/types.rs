/// Shared types used across the codebase

use serde::{Deserialize, Serialize};

/// Page selection for list queries. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Parse a raw `?page=` value. Missing, non-numeric and sub-1 values fall back to page 1.
    pub fn from_query(raw: Option<&str>, per_page: u32) -> Self {
        let page = raw
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .map(|p| p.min(u32::MAX as i64) as u32)
            .unwrap_or(1);
        Self::new(page, per_page)
    }

    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.per_page as u64
    }

    pub fn limit(&self) -> u64 {
        self.per_page as u64
    }
}

/// Pagination block returned next to list payloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: u32,
    pub total: u64,
    /// 1-based index of the first item on the page, `None` on an empty page
    pub from: Option<u64>,
    pub to: Option<u64>,
}

impl PaginationMeta {
    pub fn new(request: PageRequest, total: u64, items_on_page: usize) -> Self {
        let per_page = request.per_page as u64;
        let last_page = total.div_ceil(per_page).max(1);

        let (from, to) = if items_on_page == 0 {
            (None, None)
        } else {
            let first = request.offset() + 1;
            (Some(first), Some(first + items_on_page as u64 - 1))
        };

        Self {
            current_page: request.page,
            last_page: last_page.min(u32::MAX as u64) as u32,
            per_page: request.per_page,
            total,
            from,
            to,
        }
    }
}

/// One page of results plus its pagination metadata
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PaginationMeta,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        let meta = PaginationMeta::new(request, total, items.len());
        Self { items, meta }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}
