//! Search filters, ranking, and pagination math.
//!
//! Filters are a closed set: each named query parameter compiles to exactly
//! one [`LotFilter`] variant with a typed predicate. There is no dynamic
//! query-operator construction; a filter the set does not know cannot be
//! expressed.

use std::cmp::Ordering;

use serde::Serialize;

use crate::lot::{Amenity, ParkingLot};

/// Default number of results per page.
pub const DEFAULT_PAGE_LIMIT: u32 = 25;

/// Maximum number of results per page.
pub const MAX_PAGE_LIMIT: u32 = 100;

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Caller-facing search filter set. All fields optional, AND-combined.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    /// Free-text match against name, description, city, and state.
    pub q: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    /// Lot must carry at least one of these tags.
    pub amenities: Vec<Amenity>,
    pub min_rate: Option<f64>,
    pub max_rate: Option<f64>,
    /// Shortcut for `available_spots > 0 && is_open`.
    pub available: bool,
}

/// The closed set of lot predicates a search can apply.
#[derive(Debug, Clone)]
pub enum LotFilter {
    Text(String),
    City(String),
    State(String),
    AnyAmenity(Vec<Amenity>),
    MinRate(f64),
    MaxRate(f64),
    AvailableNow,
}

impl LotFilter {
    /// Evaluate this predicate against a lot snapshot.
    pub fn matches(&self, lot: &ParkingLot) -> bool {
        match self {
            LotFilter::Text(needle) => {
                let needle = needle.to_lowercase();
                lot.name.to_lowercase().contains(&needle)
                    || lot
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
                    || lot.address.city.to_lowercase().contains(&needle)
                    || lot.address.state.to_lowercase().contains(&needle)
            }
            LotFilter::City(needle) => lot
                .address
                .city
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            LotFilter::State(needle) => lot
                .address
                .state
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            LotFilter::AnyAmenity(wanted) => wanted.iter().any(|a| lot.amenities.contains(a)),
            LotFilter::MinRate(min) => lot.hourly_rate >= *min,
            LotFilter::MaxRate(max) => lot.hourly_rate <= *max,
            LotFilter::AvailableNow => lot.available_spots > 0 && lot.is_open,
        }
    }
}

impl SearchFilters {
    /// Compile the filter set into its predicate list. Empty and blank
    /// parameters compile to nothing.
    pub fn compile(&self) -> Vec<LotFilter> {
        let mut filters = Vec::new();

        if let Some(q) = non_blank(&self.q) {
            filters.push(LotFilter::Text(q));
        }
        if let Some(city) = non_blank(&self.city) {
            filters.push(LotFilter::City(city));
        }
        if let Some(state) = non_blank(&self.state) {
            filters.push(LotFilter::State(state));
        }
        if !self.amenities.is_empty() {
            filters.push(LotFilter::AnyAmenity(self.amenities.clone()));
        }
        if let Some(min) = self.min_rate {
            filters.push(LotFilter::MinRate(min));
        }
        if let Some(max) = self.max_rate {
            filters.push(LotFilter::MaxRate(max));
        }
        if self.available {
            filters.push(LotFilter::AvailableNow);
        }

        filters
    }

    /// AND of every compiled predicate. Inactive lots never match.
    pub fn matches(&self, lot: &ParkingLot) -> bool {
        lot.is_active && self.compile().iter().all(|f| f.matches(lot))
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Default (non-radius) ranking: rating average descending, available
/// spots descending, lot id ascending as the deterministic tie-break.
pub fn rank_unbound(a: &ParkingLot, b: &ParkingLot) -> Ordering {
    b.rating
        .average
        .partial_cmp(&a.rating.average)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.available_spots.cmp(&a.available_spots))
        .then_with(|| a.id.cmp(&b.id))
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Clamped 1-based page/limit pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub page: u32,
    pub limit: u32,
}

impl Paging {
    /// Clamp raw query parameters into valid bounds: page at least 1,
    /// limit in 1..=[`MAX_PAGE_LIMIT`] with [`DEFAULT_PAGE_LIMIT`] default.
    pub fn clamped(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT),
        }
    }

    /// Index of the first item on this page.
    pub fn start_index(&self) -> usize {
        (self.page as usize - 1) * self.limit as usize
    }
}

impl Default for Paging {
    fn default() -> Self {
        Self::clamped(None, None)
    }
}

/// One page of results plus the totals pagination clients need.
#[derive(Debug, Clone, Serialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> PagedResult<T> {
    /// Slice a fully ranked result set down to one page.
    ///
    /// A page past the end yields an empty item list, not an error.
    pub fn paginate(ranked: Vec<T>, paging: Paging) -> Self {
        let total = ranked.len();
        let start = paging.start_index().min(total);
        let end = (start + paging.limit as usize).min(total);

        let items: Vec<T> = ranked
            .into_iter()
            .skip(start)
            .take(end.saturating_sub(start))
            .collect();

        Self {
            items,
            total_count: total as u64,
            has_next: (paging.page as usize * paging.limit as usize) < total,
            has_prev: paging.start_index() > 0,
        }
    }

    /// Map the item type, keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            has_next: self.has_next,
            has_prev: self.has_prev,
        }
    }
}
