//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Default page size for paginated listing.
pub const DEFAULT_LIMIT: i64 = 20;

/// Maximum page size for paginated listing.
pub const MAX_LIMIT: i64 = 100;

/// Page-based pagination parameters (`?page=&limit=`). Pages start at 1.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageParams {
    /// Clamped `(page, limit, offset)`.
    pub fn resolve(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        (page, limit, (page - 1) * limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page() {
        assert_eq!(PageParams::default().resolve(), (1, DEFAULT_LIMIT, 0));
    }

    #[test]
    fn clamps_out_of_range_values() {
        let params = PageParams {
            page: Some(0),
            limit: Some(10_000),
        };
        assert_eq!(params.resolve(), (1, MAX_LIMIT, 0));

        let params = PageParams {
            page: Some(3),
            limit: Some(10),
        };
        assert_eq!(params.resolve(), (3, 10, 20));
    }
}
