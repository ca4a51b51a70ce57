use std::sync::Arc;

use spotwatch_events::SubscriptionHub;
use spotwatch_store::MemoryStore;

use crate::background::RatingRetryQueue;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// The lot/review document store.
    pub store: Arc<MemoryStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Subscription hub for real-time availability fan-out. Handed to the
    /// store layer explicitly on every publishing call; never reached via
    /// a global.
    pub hub: Arc<SubscriptionHub>,
    /// Queue feeding the background rating-retry worker.
    pub rating_retry: RatingRetryQueue,
}
