//! Spotwatch domain layer.
//!
//! Pure domain types and logic for the parking availability service:
//!
//! - [`geo`] — WGS84 points and great-circle distance math.
//! - [`lot`] — parking lot entity, capacity invariants, derived fields.
//! - [`review`] — review entity and validation rules.
//! - [`search`] — closed-set search filters, ranking, pagination math.
//! - [`roles`] — opaque actor identity and ownership/role checks.
//! - [`error`] — the domain error taxonomy.
//!
//! Nothing in this crate suspends or touches shared state; everything is a
//! pure function over its inputs so it can be used from the store, the
//! event hub, and the API layer alike.

pub mod error;
pub mod geo;
pub mod lot;
pub mod review;
pub mod roles;
pub mod search;
pub mod types;

pub use error::CoreError;
