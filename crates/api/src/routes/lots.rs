//! Route definitions for parking lots.
//!
//! ```text
//! GET    /                     -> list_lots
//! POST   /                     -> create_lot
//! GET    /search               -> search_lots
//! GET    /nearby               -> nearby_lots
//! GET    /{id}                 -> get_lot
//! PUT    /{id}                 -> update_lot
//! DELETE /{id}                 -> delete_lot (soft)
//! PUT    /{id}/availability    -> update_availability
//! GET    /{id}/stats           -> lot_stats
//! GET    /{lot_id}/reviews     -> list_reviews
//! POST   /{lot_id}/reviews     -> create_review
//! ```

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{availability, lots, reviews, search};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(lots::list_lots).post(lots::create_lot))
        .route("/search", get(search::search_lots))
        .route("/nearby", get(search::nearby_lots))
        .route(
            "/{id}",
            get(lots::get_lot)
                .put(lots::update_lot)
                .delete(lots::delete_lot),
        )
        .route("/{id}/availability", put(availability::update_availability))
        .route("/{id}/stats", get(availability::lot_stats))
        .route(
            "/{lot_id}/reviews",
            get(reviews::list_reviews).post(reviews::create_review),
        )
}
