//! Route definitions for standalone review operations.
//!
//! Creation and listing are lot-scoped and live under `/lots`; direct
//! review mutation is addressed by review id here.
//!
//! ```text
//! GET    /{id}   -> get_review
//! PUT    /{id}   -> update_review
//! DELETE /{id}   -> delete_review
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::reviews;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(reviews::get_review)
            .put(reviews::update_review)
            .delete(reviews::delete_review),
    )
}
