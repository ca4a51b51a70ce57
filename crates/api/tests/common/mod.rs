//! Shared fixtures for API integration tests.
//!
//! Builds the application router through the same [`build_app_router`]
//! used by `main.rs`, so every test exercises the production middleware
//! stack. The store and hub handles are exposed for assertions that need
//! to look behind the HTTP surface (e.g. event delivery).

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

use spotwatch_api::background::RatingRetryQueue;
use spotwatch_api::config::ServerConfig;
use spotwatch_api::router::build_app_router;
use spotwatch_api::state::AppState;
use spotwatch_core::roles::{Actor, Role};
use spotwatch_events::SubscriptionHub;
use spotwatch_store::MemoryStore;

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub hub: Arc<SubscriptionHub>,
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        ws_send_buffer: 64,
        rating_retry_interval_secs: 30,
    }
}

/// Build the full application with a fresh store and hub.
pub fn build_test_app() -> TestApp {
    let config = test_config();
    let store = Arc::new(MemoryStore::new());
    let hub = Arc::new(SubscriptionHub::new(config.ws_send_buffer));
    // The worker is not spawned in tests; the queue handle is enough.
    let (rating_retry, _retry_rx) = RatingRetryQueue::new();

    let state = AppState {
        store: Arc::clone(&store),
        config: Arc::new(config.clone()),
        hub: Arc::clone(&hub),
        rating_retry,
    };

    TestApp {
        router: build_app_router(state, &config),
        store,
        hub,
    }
}

pub fn owner() -> Actor {
    Actor::new(Uuid::new_v4(), Role::ParkingOwner)
}

pub fn admin() -> Actor {
    Actor::new(Uuid::new_v4(), Role::Admin)
}

pub fn user() -> Actor {
    Actor::new(Uuid::new_v4(), Role::User)
}

fn role_header(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::ParkingOwner => "parking-owner",
        Role::Admin => "admin",
    }
}

/// Send one request through the router and return status + parsed body.
pub async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    actor: Option<&Actor>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(actor) = actor {
        builder = builder
            .header("x-actor-id", actor.id.to_string())
            .header("x-actor-role", role_header(actor.role));
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .expect("request builds"),
        None => builder.body(Body::empty()).expect("request builds"),
    };

    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router responds");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}

pub async fn get(router: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(router, "GET", uri, None, None).await
}

/// A valid lot-creation payload at the given position.
pub fn lot_payload(name: &str, latitude: f64, longitude: f64, total: u32) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "address": {
            "street": "1 Main St",
            "city": "Springfield",
            "state": "IL",
            "zip_code": "62701",
            "country": "United States"
        },
        "latitude": latitude,
        "longitude": longitude,
        "total_spots": total,
        "available_spots": total,
        "hourly_rate": 2.5
    })
}

/// Create a lot over HTTP and return its id.
pub async fn seed_lot(router: &Router, actor: &Actor, name: &str) -> Uuid {
    seed_lot_at(router, actor, name, 10.0, 20.0).await
}

pub async fn seed_lot_at(
    router: &Router,
    actor: &Actor,
    name: &str,
    latitude: f64,
    longitude: f64,
) -> Uuid {
    let (status, body) = send(
        router,
        "POST",
        "/api/v1/lots",
        Some(actor),
        Some(lot_payload(name, latitude, longitude, 10)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "seed lot failed: {body}");
    body["data"]["id"]
        .as_str()
        .expect("lot id in response")
        .parse()
        .expect("lot id is a uuid")
}

/// Post a review by a fresh user and return (author, review id).
pub async fn seed_review(router: &Router, lot_id: Uuid, rating: u8) -> (Actor, Uuid) {
    let author = user();
    let (status, body) = send(
        router,
        "POST",
        &format!("/api/v1/lots/{lot_id}/reviews"),
        Some(&author),
        Some(serde_json::json!({
            "rating": rating,
            "comment": "Plenty of space and easy access"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "seed review failed: {body}");
    let id = body["data"]["id"]
        .as_str()
        .expect("review id in response")
        .parse()
        .expect("review id is a uuid");
    (author, id)
}
