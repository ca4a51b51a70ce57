//! The canonical lot change-event envelope.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use spotwatch_core::lot::ParkingLot;
use spotwatch_core::types::{LotId, Timestamp};

/// Event type emitted after every committed availability mutation.
pub const EVENT_AVAILABILITY_CHANGED: &str = "lot.availability_changed";

/// A state change on a single lot, as delivered to subscribers.
///
/// The payload carries the full post-commit availability state so a client
/// can render from the event alone, without a follow-up fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotEvent {
    /// Dot-separated event name, e.g. `"lot.availability_changed"`.
    pub event_type: String,

    /// The lot this event is about.
    pub lot_id: LotId,

    /// Event-specific JSON payload.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: Timestamp,
}

impl LotEvent {
    /// Create a new event with an empty payload.
    pub fn new(event_type: impl Into<String>, lot_id: LotId) -> Self {
        Self {
            event_type: event_type.into(),
            lot_id,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// Build the availability-changed event from a committed lot snapshot.
    pub fn availability_changed(lot: &ParkingLot) -> Self {
        Self::new(EVENT_AVAILABILITY_CHANGED, lot.id).with_payload(serde_json::json!({
            "available_spots": lot.available_spots,
            "total_spots": lot.total_spots,
            "is_open": lot.is_open,
            "occupancy_percentage": lot.occupancy_percentage(),
        }))
    }
}
