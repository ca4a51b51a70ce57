/// Lot identifiers are opaque UUIDs assigned at creation.
pub type LotId = uuid::Uuid;

/// Review identifiers are opaque UUIDs assigned at creation.
pub type ReviewId = uuid::Uuid;

/// User identifiers come from the external identity provider.
pub type UserId = uuid::Uuid;

/// One WebSocket connection gets one client id for its lifetime.
pub type ClientId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
