//! Comment pagination.
//!
//! Callers pass a raw `(page, page_size)` pair. `(-1, -1)` asks for every
//! comment; any other pair must have both values at least 1. Pages are
//! 1-based: page `p` of size `k` covers `[(p-1)*k, (p-1)*k + k)`.

use crate::error::{RepositoryError, RepositoryResult};

/// Raw value that requests all results when used for both page and page size
pub const ALL_RESULTS_SENTINEL: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    /// No pagination
    All,
    /// 1-based page of `page_size` items
    Page { page: u64, page_size: u64 },
}

impl PageRequest {
    pub fn from_raw(page: i64, page_size: i64) -> RepositoryResult<Self> {
        if page == ALL_RESULTS_SENTINEL && page_size == ALL_RESULTS_SENTINEL {
            return Ok(PageRequest::All);
        }
        if page < 1 || page_size < 1 {
            return Err(RepositoryError::InvalidArgument(format!(
                "invalid values for page ({}) or page size ({})",
                page, page_size
            )));
        }
        Ok(PageRequest::Page {
            page: page as u64,
            page_size: page_size as u64,
        })
    }

    pub fn page(page: u64, page_size: u64) -> RepositoryResult<Self> {
        Self::from_raw(
            i64::try_from(page).unwrap_or(i64::MAX),
            i64::try_from(page_size).unwrap_or(i64::MAX),
        )
    }

    /// Number of items skipped before this page
    pub fn offset(&self) -> u64 {
        match *self {
            PageRequest::All => 0,
            PageRequest::Page { page, page_size } => {
                page.saturating_sub(1).saturating_mul(page_size)
            }
        }
    }

    /// Maximum number of items on this page, `None` when unpaginated
    pub fn limit(&self) -> Option<u64> {
        match *self {
            PageRequest::All => None,
            PageRequest::Page { page_size, .. } => Some(page_size),
        }
    }

    /// Whether this page starts past the last of `total` items.
    ///
    /// The first page is never out of range, even for an empty collection.
    pub fn is_out_of_range(&self, total: u64) -> bool {
        let offset = self.offset();
        offset > 0 && offset >= total
    }

    /// Slice an already-ordered list down to this page
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        match self.limit() {
            None => items,
            Some(limit) => {
                let offset = usize::try_from(self.offset()).unwrap_or(usize::MAX);
                let limit = usize::try_from(limit).unwrap_or(usize::MAX);
                items.into_iter().skip(offset).take(limit).collect()
            }
        }
    }
}

/// What to do when a requested page starts past the last comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutOfRangePolicy {
    /// Return an empty page
    #[default]
    Empty,
    /// Fail with `OutOfRange`
    Reject,
}

impl std::str::FromStr for OutOfRangePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "empty" => Ok(OutOfRangePolicy::Empty),
            "reject" => Ok(OutOfRangePolicy::Reject),
            other => Err(format!(
                "unknown out-of-range policy '{}', expected 'empty' or 'reject'",
                other
            )),
        }
    }
}
