//! Spotwatch subscription hub and event types.
//!
//! This crate owns real-time propagation of lot state changes:
//!
//! - [`LotEvent`] — the canonical change-event envelope.
//! - [`SubscriptionHub`] — per-lot publish/subscribe with per-client
//!   bounded outbound channels.
//!
//! The hub is designed to be shared via `Arc<SubscriptionHub>` and handed
//! explicitly to every component that publishes; there is no process-wide
//! broadcast singleton.

pub mod event;
pub mod hub;

pub use event::{LotEvent, EVENT_AVAILABILITY_CHANGED};
pub use hub::SubscriptionHub;
