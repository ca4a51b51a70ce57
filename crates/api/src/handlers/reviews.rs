//! Handlers for review CRUD.
//!
//! Every committed review mutation explicitly triggers a rating recompute
//! for the owning lot. The recompute is the sole writer of the cached
//! rating; its failure never fails the review operation, it is queued for
//! the background retry worker instead.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use spotwatch_core::review::{CreateReview, UpdateReview};
use spotwatch_core::types::{LotId, ReviewId};
use spotwatch_store::{LotRepo, RatingAggregator, ReviewRepo};

use crate::error::AppResult;
use crate::middleware::AuthActor;
use crate::response::DataResponse;
use crate::state::AppState;

/// Recompute the lot rating after a committed review mutation.
///
/// Failures are logged and queued for retry; the caller's mutation has
/// already committed and must not be rolled back or failed.
async fn recompute_or_queue(state: &AppState, lot_id: LotId) {
    if let Err(err) = RatingAggregator::recompute(&state.store, lot_id).await {
        tracing::error!(%lot_id, error = %err, "Rating recompute failed, queuing retry");
        state.rating_retry.enqueue(lot_id);
    }
}

/// GET /api/v1/lots/{lot_id}/reviews
///
/// All reviews for a lot, newest first. Also serves soft-deleted lots:
/// their review history stays readable.
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(lot_id): Path<LotId>,
) -> AppResult<impl IntoResponse> {
    // Resolve the lot first so an unknown id is a 404, not an empty list.
    LotRepo::get(&state.store, lot_id).await?;
    let reviews = ReviewRepo::list_for_lot(&state.store, lot_id).await;
    Ok(Json(DataResponse { data: reviews }))
}

/// POST /api/v1/lots/{lot_id}/reviews
///
/// One review per (user, lot); duplicates conflict.
pub async fn create_review(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    Path(lot_id): Path<LotId>,
    Json(input): Json<CreateReview>,
) -> AppResult<impl IntoResponse> {
    let review = ReviewRepo::create(&state.store, lot_id, input, &actor).await?;
    recompute_or_queue(&state, lot_id).await;
    Ok((StatusCode::CREATED, Json(DataResponse { data: review })))
}

/// GET /api/v1/reviews/{id}
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<ReviewId>,
) -> AppResult<impl IntoResponse> {
    let review = ReviewRepo::get(&state.store, id).await?;
    Ok(Json(DataResponse { data: review }))
}

/// PUT /api/v1/reviews/{id}
///
/// Author/admin edit.
pub async fn update_review(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    Path(id): Path<ReviewId>,
    Json(input): Json<UpdateReview>,
) -> AppResult<impl IntoResponse> {
    let review = ReviewRepo::update(&state.store, id, input, &actor).await?;
    recompute_or_queue(&state, review.lot_id).await;
    Ok(Json(DataResponse { data: review }))
}

/// DELETE /api/v1/reviews/{id}
///
/// Author/admin delete.
pub async fn delete_review(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    Path(id): Path<ReviewId>,
) -> AppResult<impl IntoResponse> {
    let removed = ReviewRepo::delete(&state.store, id, &actor).await?;
    recompute_or_queue(&state, removed.lot_id).await;
    Ok(Json(DataResponse {
        data: serde_json::json!({}),
    }))
}
