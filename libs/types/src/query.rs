//! Query parameters for a ranked sentiment request

use serde::{Deserialize, Serialize};

/// Limit used when a request does not carry one.
pub const DEFAULT_LIMIT: i64 = 30;

/// Display tiers offered by the dashboard. Other positive values are
/// tolerated everywhere; nothing rejects a non-tier limit.
pub const LIMIT_TIERS: [i64; 5] = [10, 20, 30, 50, 100];

/// Sort direction and result limit for one pipeline invocation.
///
/// `limit` is carried as a signed integer and passed through unclamped:
/// zero or negative values reach both the live request and the sample
/// truncation as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryParams {
    pub sort_descending: bool,
    pub limit: i64,
}

impl QueryParams {
    pub fn new(sort_descending: bool, limit: i64) -> Self {
        Self {
            sort_descending,
            limit,
        }
    }

    /// Binary flag used on the wire for `desc`.
    pub fn desc_flag(&self) -> &'static str {
        if self.sort_descending {
            "1"
        } else {
            "0"
        }
    }

    /// Whether `limit` is one of the UI's display tiers.
    pub fn is_standard_tier(&self) -> bool {
        LIMIT_TIERS.contains(&self.limit)
    }

    pub fn with_sort_toggled(self) -> Self {
        Self {
            sort_descending: !self.sort_descending,
            ..self
        }
    }

    pub fn with_limit(self, limit: i64) -> Self {
        Self { limit, ..self }
    }
}

impl Default for QueryParams {
    fn default() -> Self {
        Self::new(false, DEFAULT_LIMIT)
    }
}
