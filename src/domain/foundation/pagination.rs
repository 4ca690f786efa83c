//! Page requests and the paginated result envelope.

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Requested page (1-based) and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    pub const DEFAULT_PAGE_SIZE: u32 = 20;
    pub const MAX_PAGE_SIZE: u32 = 100;

    /// Creates a page request, rejecting page 0 and sizes outside 1..=100.
    pub fn new(page: u32, page_size: u32) -> Result<Self, ValidationError> {
        if page == 0 {
            return Err(ValidationError::out_of_range("page", 1, u32::MAX as i64, 0));
        }
        if page_size == 0 || page_size > Self::MAX_PAGE_SIZE {
            return Err(ValidationError::out_of_range(
                "page_size",
                1,
                Self::MAX_PAGE_SIZE as i64,
                page_size as i64,
            ));
        }
        Ok(Self { page, page_size })
    }

    /// Builds a request from optional query parameters, falling back to defaults.
    pub fn from_params(page: Option<u32>, page_size: Option<u32>) -> Result<Self, ValidationError> {
        Self::new(
            page.unwrap_or(1),
            page_size.unwrap_or(Self::DEFAULT_PAGE_SIZE),
        )
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.page_size as u64
    }

    /// Number of rows to take.
    pub fn limit(&self) -> u64 {
        self.page_size as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results plus the total count computed against the same filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, total_count: u64, request: PageRequest) -> Self {
        let page_size = request.page_size() as u64;
        let total_pages = (total_count + page_size - 1) / page_size;
        let page = request.page();
        Self {
            items,
            page,
            page_size: request.page_size(),
            total_count,
            total_pages,
            has_previous_page: page > 1,
            has_next_page: (page as u64) < total_pages,
        }
    }

    /// Slices an already-filtered, ordered collection into the requested page.
    pub fn from_vec(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.limit() as usize)
            .collect();
        Self::new(items, total, request)
    }

    /// Transforms the items while keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResult<U> {
        PaginatedResult {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
            has_previous_page: self.has_previous_page,
            has_next_page: self.has_next_page,
        }
    }
}
