//! Paging and sort direction for list endpoints.

/// Direction of a single-column ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sort {
    Desc,
    Asc,
}

/// One page of a list, numbered from 1.
///
/// Values outside `1..=MAX_PER_PAGE` / `1..` are accepted and clamped when
/// the page is turned into an offset and limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub per_page: u32,
    pub page: u32,
}

impl PageRequest {
    pub const DEFAULT_PER_PAGE: u32 = 25;
    pub const MAX_PER_PAGE: u32 = 100;

    /// Build a page from optional `per-page` / `page` query parameters.
    pub fn from_query(per_page: Option<u32>, page: Option<u32>) -> Self {
        Self {
            per_page: per_page.unwrap_or(Self::DEFAULT_PER_PAGE),
            page: page.unwrap_or(1),
        }
    }

    pub fn clamped(self) -> Self {
        Self {
            per_page: self.per_page.clamp(1, Self::MAX_PER_PAGE),
            page: self.page.max(1),
        }
    }

    /// Rows to skip.
    pub fn offset(self) -> u64 {
        let Self { per_page, page } = self.clamped();
        u64::from(page - 1) * u64::from(per_page)
    }

    /// Rows to return.
    pub fn limit(self) -> u64 {
        u64::from(self.clamped().per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::from_query(None, None)
    }
}
