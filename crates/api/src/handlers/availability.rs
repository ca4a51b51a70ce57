//! Handlers for the availability mutation and the stats snapshot.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use spotwatch_core::lot::{LotStats, UpdateAvailability};
use spotwatch_core::types::LotId;
use spotwatch_store::{LotRepo, ReviewRepo};

use crate::error::AppResult;
use crate::middleware::AuthActor;
use crate::response::DataResponse;
use crate::state::AppState;

/// PUT /api/v1/lots/{id}/availability
///
/// Owner/admin (or trusted sensor gateway) occupancy mutation. On success
/// the committed snapshot is returned and the change event has already
/// been handed to the subscription hub; write-path failures are never
/// retried here to avoid double-applying a mutation.
pub async fn update_availability(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    Path(id): Path<LotId>,
    Json(input): Json<UpdateAvailability>,
) -> AppResult<impl IntoResponse> {
    let snapshot =
        LotRepo::update_availability(&state.store, &state.hub, id, input, &actor).await?;
    Ok(Json(DataResponse { data: snapshot }))
}

/// GET /api/v1/lots/{id}/stats
///
/// Capacity, occupancy, rating, and review-count snapshot for one lot.
/// Works for soft-deleted lots too, so historical references keep
/// resolving.
pub async fn lot_stats(
    State(state): State<AppState>,
    Path(id): Path<LotId>,
) -> AppResult<impl IntoResponse> {
    let lot = LotRepo::get(&state.store, id).await?;
    let reviews_count = ReviewRepo::count_for_lot(&state.store, id).await;
    Ok(Json(DataResponse {
        data: LotStats::project(&lot, reviews_count),
    }))
}
