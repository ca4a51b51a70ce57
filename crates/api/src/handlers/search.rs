//! Handlers for lot discovery: filtered search and radius queries.
//!
//! Both are public reads over snapshot state, so a transient store failure
//! is retried once before surfacing. Results may be a few milliseconds
//! stale relative to concurrent availability writers; that staleness is an
//! accepted property of the read path, not a bug.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use spotwatch_core::geo::GeoPoint;
use spotwatch_core::lot::{Amenity, LotSummary};
use spotwatch_core::search::SearchFilters;
use spotwatch_store::{retry::read_with_retry, LotRepo};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Default radius for nearby queries, in kilometers.
const DEFAULT_RADIUS_KM: f64 = 10.0;

// ---------------------------------------------------------------------------
// Filtered search
// ---------------------------------------------------------------------------

/// Query parameters for GET /api/v1/lots/search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    /// Comma-separated amenity tags.
    pub amenities: Option<String>,
    pub min_rate: Option<f64>,
    pub max_rate: Option<f64>,
    #[serde(default)]
    pub available: bool,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl SearchQuery {
    /// Compile the raw query into the typed filter set. Unknown amenity
    /// tags are a validation error.
    fn filters(&self) -> Result<SearchFilters, spotwatch_core::CoreError> {
        let amenities = match self.amenities.as_deref() {
            Some(raw) => Amenity::parse_list(raw)?,
            None => Vec::new(),
        };
        Ok(SearchFilters {
            q: self.q.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            amenities,
            min_rate: self.min_rate,
            max_rate: self.max_rate,
            available: self.available,
        })
    }
}

/// GET /api/v1/lots/search
///
/// Filtered, ranked, paged search. Ranking is rating average descending,
/// then available spots, then lot id for stable pagination.
pub async fn search_lots(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<impl IntoResponse> {
    let filters = query.filters()?;
    let paging = spotwatch_core::search::Paging::clamped(query.page, query.limit);

    let store = Arc::clone(&state.store);
    let page = read_with_retry(move || {
        let store = Arc::clone(&store);
        let filters = filters.clone();
        async move { LotRepo::search(&store, &filters, paging).await }
    })
    .await?;

    tracing::debug!(
        total = page.total_count,
        page = paging.page,
        "Lot search executed"
    );

    let page = page.map(|lot| LotSummary::from(&lot));
    Ok(Json(DataResponse { data: page }))
}

// ---------------------------------------------------------------------------
// Radius query
// ---------------------------------------------------------------------------

/// Query parameters for GET /api/v1/lots/nearby.
#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub latitude: f64,
    pub longitude: f64,
    /// Kilometers; defaults to 10.
    pub radius_km: Option<f64>,
}

/// GET /api/v1/lots/nearby
///
/// Active lots within the radius, ordered by ascending great-circle
/// distance. The boundary is inclusive.
pub async fn nearby_lots(
    State(state): State<AppState>,
    Query(query): Query<NearbyQuery>,
) -> AppResult<impl IntoResponse> {
    let center = GeoPoint::new(query.latitude, query.longitude)?;
    let radius_km = query.radius_km.unwrap_or(DEFAULT_RADIUS_KM);

    let store = Arc::clone(&state.store);
    let hits = read_with_retry(move || {
        let store = Arc::clone(&store);
        async move { LotRepo::find_within_radius(&store, center, radius_km).await }
    })
    .await?;

    let items: Vec<LotSummary> = hits
        .iter()
        .map(|(lot, distance)| LotSummary::from(lot).with_distance(*distance))
        .collect();

    Ok(Json(DataResponse { data: items }))
}
