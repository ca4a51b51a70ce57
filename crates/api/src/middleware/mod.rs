//! Request-level middleware and extractors.

pub mod actor;

pub use actor::AuthActor;
