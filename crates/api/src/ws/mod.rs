//! WebSocket infrastructure for real-time availability propagation.
//!
//! One connection equals one hub client: the upgrade handler registers a
//! fresh client id with the subscription hub, forwards hub events to the
//! socket, and tears the registration down in total when the connection
//! ends for any reason.

mod handler;

pub use handler::ws_handler;

/// Interval between heartbeat pings (in seconds).
pub const HEARTBEAT_INTERVAL_SECS: u64 = 30;
