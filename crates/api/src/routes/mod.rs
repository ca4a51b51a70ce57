pub mod health;
pub mod lots;
pub mod reviews;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                 availability event WebSocket
///
/// /lots                               list, create
/// /lots/search                        filtered + ranked search
/// /lots/nearby                        radius query
/// /lots/{id}                          get, update, delete (soft)
/// /lots/{id}/availability             availability mutation (PUT)
/// /lots/{id}/stats                    stats snapshot
/// /lots/{lot_id}/reviews              list, create
///
/// /reviews/{id}                       get, update, delete
/// ```
///
/// Reads are public; every mutation requires the asserted identity pair
/// on the `x-actor-id` / `x-actor-role` headers.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/lots", lots::router())
        .nest("/reviews", reviews::router())
}
