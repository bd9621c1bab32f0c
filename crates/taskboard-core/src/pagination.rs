use serde::{Deserialize, Serialize};

/// Page-size bounds applied to every listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    pub default_limit: u16,
    pub max_limit: u16,
}

impl PaginationConfig {
    pub const DEFAULT_LIMIT: u16 = 20;
    pub const MAX_LIMIT: u16 = 100;
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: Self::DEFAULT_LIMIT,
            max_limit: Self::MAX_LIMIT,
        }
    }
}

/// Window reported back to the caller next to the results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: u16,
    pub page: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPage {
    pub skip: u64,
    pub limit: u16,
    pub pagination: Pagination,
}

impl PaginationConfig {
    /// Effective page size: the default for 0, clamped to `max_limit`.
    pub fn effective_limit(&self, requested: u16) -> u16 {
        if requested == 0 {
            return self.default_limit;
        }
        if requested > self.max_limit {
            tracing::warn!(
                "Used {} (max limit) instead of {}",
                self.max_limit,
                requested
            );
            return self.max_limit;
        }
        requested
    }

    /// Turns a requested `(limit, page)` into skip/limit values.
    ///
    /// Pages 0 and 1 both start at the first record. Past page 1 the offset is
    /// `limit * page`, so page 2 starts at record `2 * limit`.
    pub fn resolve(&self, limit: u16, page: u16) -> ResolvedPage {
        let limit = self.effective_limit(limit);
        let skip = if page > 1 {
            u64::from(limit) * u64::from(page)
        } else {
            0
        };

        ResolvedPage {
            skip,
            limit,
            pagination: Pagination { limit, page },
        }
    }
}
