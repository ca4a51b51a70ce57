//! Background workers.

pub mod rating_retry;

pub use rating_retry::{spawn_rating_retry_worker, RatingRetryQueue};
