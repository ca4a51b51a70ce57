//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Generic pagination parameters (`?page=&limit=`).
///
/// Values are clamped in `spotwatch_core::search::Paging`; page is 1-based.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PaginationParams {
    pub fn paging(&self) -> spotwatch_core::search::Paging {
        spotwatch_core::search::Paging::clamped(self.page, self.limit)
    }
}
