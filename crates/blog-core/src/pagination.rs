//! Page-number pagination.
//!
//! Pagination is opt-in: [`PageNumberPagination::page_request`] returns `None`
//! when the client sent neither a page nor a page size, and the caller then
//! serves the whole collection.

use thiserror::Error;

/// Query parameter carrying the page number.
pub const PAGE_QUERY_PARAM: &str = "page";
/// Query parameter overriding the page size.
pub const PAGE_SIZE_QUERY_PARAM: &str = "page_size";
/// Page number alias for the final page.
pub const LAST_PAGE: &str = "last";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("Invalid page.")]
    InvalidPage,
}

/// Paginator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageNumberPagination {
    pub page_size: u64,
    pub max_page_size: Option<u64>,
}

impl Default for PageNumberPagination {
    fn default() -> Self {
        Self {
            page_size: 3,
            max_page_size: None,
        }
    }
}

impl PageNumberPagination {
    /// Interpret the raw `page` and `page_size` query values.
    pub fn page_request(
        &self,
        page: Option<&str>,
        page_size: Option<&str>,
    ) -> Result<Option<PageRequest>, PaginationError> {
        if page.is_none() && page_size.is_none() {
            return Ok(None);
        }

        let number = match page.map(str::trim) {
            None | Some("") => PageNumber::Number(1),
            Some(LAST_PAGE) => PageNumber::Last,
            Some(raw) => match raw.parse::<u64>() {
                Ok(n) if n >= 1 => PageNumber::Number(n),
                _ => return Err(PaginationError::InvalidPage),
            },
        };

        Ok(Some(PageRequest {
            number,
            size: self.effective_page_size(page_size),
        }))
    }

    /// A client-supplied size wins when it is a positive integer; anything
    /// else falls back to the configured default.
    fn effective_page_size(&self, requested: Option<&str>) -> u64 {
        let size = requested
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(self.page_size);

        match self.max_page_size {
            Some(max) => size.min(max),
            None => size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNumber {
    Number(u64),
    Last,
}

/// A requested page, not yet checked against the collection size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: PageNumber,
    pub size: u64,
}

impl PageRequest {
    /// Resolve the request against a collection of `count` items.
    ///
    /// An empty collection still has a first page.
    pub fn locate(&self, count: u64) -> Result<PageWindow, PaginationError> {
        let num_pages = count.div_ceil(self.size).max(1);
        let number = match self.number {
            PageNumber::Number(n) => n,
            PageNumber::Last => num_pages,
        };
        if number > num_pages {
            return Err(PaginationError::InvalidPage);
        }

        Ok(PageWindow {
            number,
            size: self.size,
            num_pages,
        })
    }
}

/// A page that exists in the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: u64,
    pub size: u64,
    pub num_pages: u64,
}

impl PageWindow {
    pub fn slice(&self) -> Slice {
        Slice {
            offset: (self.number - 1) * self.size,
            limit: self.size,
        }
    }

    pub fn next_number(&self) -> Option<u64> {
        (self.number < self.num_pages).then(|| self.number + 1)
    }

    pub fn previous_number(&self) -> Option<u64> {
        (self.number > 1).then(|| self.number - 1)
    }
}

/// Offset/limit window handed to a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    pub offset: u64,
    pub limit: u64,
}
