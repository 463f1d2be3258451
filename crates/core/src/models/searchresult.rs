//! Pagination envelope shared by the per-family search results

use serde::{Deserialize, Serialize};

/// Pagination metadata returned with every document listing.
///
/// Family-specific search results flatten this struct next to their
/// `documents` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub found_count: i64,
    pub page: i64,
    pub page_count: i64,
    pub per_page: i64,
    pub total_count: i64,
}
