use axum::response::IntoResponse;
use axum::routing::get;
use axum::Json;
use axum::Router;

use crate::state::AppState;

/// Root-level health check router (outside `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// GET /health
///
/// Liveness probe for load balancers and orchestration.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
