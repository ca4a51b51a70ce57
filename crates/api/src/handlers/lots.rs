//! Handlers for parking lot CRUD.
//!
//! Reads are public; creation needs an authenticated actor and edits are
//! owner/admin only (enforced in the repository layer). Deletes are soft:
//! the lot drops out of discovery but stays fetchable by id so reviews and
//! stats keep resolving.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use spotwatch_core::lot::{CreateLot, UpdateLot};
use spotwatch_core::types::LotId;
use spotwatch_store::LotRepo;

use crate::error::AppResult;
use crate::middleware::AuthActor;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/lots
///
/// Active lots, newest first, paged.
pub async fn list_lots(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let page = LotRepo::list(&state.store, params.paging()).await;
    Ok(Json(DataResponse { data: page }))
}

/// POST /api/v1/lots
///
/// Create a lot owned by the acting identity.
pub async fn create_lot(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    Json(input): Json<CreateLot>,
) -> AppResult<impl IntoResponse> {
    let lot = LotRepo::create(&state.store, input, &actor).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: lot })))
}

/// GET /api/v1/lots/{id}
pub async fn get_lot(
    State(state): State<AppState>,
    Path(id): Path<LotId>,
) -> AppResult<impl IntoResponse> {
    let lot = LotRepo::get(&state.store, id).await?;
    Ok(Json(DataResponse { data: lot }))
}

/// PUT /api/v1/lots/{id}
///
/// Owner/admin metadata edit.
pub async fn update_lot(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    Path(id): Path<LotId>,
    Json(input): Json<UpdateLot>,
) -> AppResult<impl IntoResponse> {
    let lot = LotRepo::update(&state.store, id, input, &actor).await?;
    Ok(Json(DataResponse { data: lot }))
}

/// DELETE /api/v1/lots/{id}
///
/// Soft delete (deactivate).
pub async fn delete_lot(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    Path(id): Path<LotId>,
) -> AppResult<impl IntoResponse> {
    LotRepo::deactivate(&state.store, id, &actor).await?;
    Ok(Json(DataResponse {
        data: serde_json::json!({}),
    }))
}
