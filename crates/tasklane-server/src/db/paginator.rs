//! Pages of query results with their pagination metadata.

/// One page of results.
///
/// A page produced by `paginate` knows the total row count ("full"
/// pagination). A page produced by `simple_paginate` only knows whether
/// another page follows ("minimal" pagination); it has no total and no last
/// page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,

    /// 1-based page number.
    pub current_page: u64,

    /// Page size.
    pub per_page: u64,

    /// Total rows across all pages, when counted.
    pub total: Option<u64>,

    /// Whether another page follows (minimal pages only).
    has_more: bool,

    /// Base path used to build page URLs.
    pub path: String,
}

impl<T> Page<T> {
    /// Create a fully counted page.
    pub fn length_aware(items: Vec<T>, total: u64, per_page: u64, current_page: u64) -> Self {
        Self {
            items,
            current_page: current_page.max(1),
            per_page: per_page.max(1),
            total: Some(total),
            has_more: false,
            path: String::new(),
        }
    }

    /// Create a page that does not know the total row count.
    pub fn simple(items: Vec<T>, per_page: u64, current_page: u64, has_more: bool) -> Self {
        Self {
            items,
            current_page: current_page.max(1),
            per_page: per_page.max(1),
            total: None,
            has_more,
            path: String::new(),
        }
    }

    /// Builder method to set the base path for page URLs.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// True when the total row count is unknown.
    pub fn is_minimal(&self) -> bool {
        self.total.is_none()
    }

    /// 1-based position of the first item, `None` on an empty page.
    pub fn from(&self) -> Option<u64> {
        if self.items.is_empty() {
            None
        } else {
            Some((self.current_page - 1).saturating_mul(self.per_page).saturating_add(1))
        }
    }

    /// 1-based position of the last item, `None` on an empty page.
    pub fn to(&self) -> Option<u64> {
        self.from()
            .map(|from| from.saturating_add(self.items.len() as u64 - 1))
    }

    /// Last page number, known only for fully counted pages.
    pub fn last_page(&self) -> Option<u64> {
        self.total
            .map(|total| total.div_ceil(self.per_page).max(1))
    }

    pub fn has_more_pages(&self) -> bool {
        match self.last_page() {
            Some(last) => self.current_page < last,
            None => self.has_more,
        }
    }

    /// URL of the given page number.
    pub fn url(&self, page: u64) -> String {
        format!("{}?page={}", self.path, page.max(1))
    }

    pub fn first_page_url(&self) -> String {
        self.url(1)
    }

    pub fn last_page_url(&self) -> Option<String> {
        self.last_page().map(|last| self.url(last))
    }

    pub fn next_page_url(&self) -> Option<String> {
        self.has_more_pages()
            .then(|| self.url(self.current_page.saturating_add(1)))
    }

    pub fn prev_page_url(&self) -> Option<String> {
        (self.current_page > 1).then(|| self.url(self.current_page - 1))
    }

    /// Transform the items fallibly, keeping the metadata.
    pub fn try_map<U, E, F: FnMut(T) -> Result<U, E>>(self, f: F) -> Result<Page<U>, E> {
        let items = self.items.into_iter().map(f).collect::<Result<Vec<U>, E>>()?;
        Ok(Page {
            items,
            current_page: self.current_page,
            per_page: self.per_page,
            total: self.total,
            has_more: self.has_more,
            path: self.path,
        })
    }
}
