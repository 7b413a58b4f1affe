use thiserror::Error;

/// Rejected page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid page request: page {page}, limit {limit} (both must be at least 1)")]
pub struct PageRequestError {
    pub page: u32,
    pub limit: u32,
}

/// A 1-indexed page of products to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub(crate) page: u32,
    pub(crate) limit: u32,
}

impl PageRequest {
    /// Creates a page request. Both `page` and `limit` must be at least 1.
    pub fn new(page: u32, limit: u32) -> Result<Self, PageRequestError> {
        if page == 0 || limit == 0 {
            return Err(PageRequestError { page, limit });
        }
        Ok(Self { page, limit })
    }

    /// Creates a request for the first page.
    pub fn first(limit: u32) -> Result<Self, PageRequestError> {
        Self::new(1, limit)
    }

    /// Returns the 1-indexed page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Returns the maximum number of items on the page.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of items to skip: `(page - 1) * limit`.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// Returns the request for the following page.
    pub fn next(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            limit: self.limit,
        }
    }
}

/// One page of results together with the total number of matching items.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    /// Creates a page.
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }

    /// Creates an empty page with no matching items.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }

    /// Converts every item, keeping the total.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }

    /// Converts every item with a fallible function, stopping at the first error.
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        Ok(Page {
            items: self.items.into_iter().map(f).collect::<Result<_, _>>()?,
            total: self.total,
        })
    }
}
