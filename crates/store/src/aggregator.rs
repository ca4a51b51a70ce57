//! Rating recomputation.
//!
//! [`RatingAggregator::recompute`] is the only code path that writes a
//! lot's cached `rating` field. Review mutation handlers call it
//! explicitly after each committed create/update/delete; a failure there
//! never rolls back or fails the review operation itself.

use spotwatch_core::error::CoreError;
use spotwatch_core::lot::Rating;
use spotwatch_core::review::aggregate_ratings;
use spotwatch_core::types::LotId;

use crate::memory::MemoryStore;
use crate::review_repo::ReviewRepo;

pub struct RatingAggregator;

impl RatingAggregator {
    /// Recompute and persist a lot's cached rating from its current
    /// review set. Zero remaining reviews reset the rating to `(0.0, 0)`.
    ///
    /// Soft-deleted lots are still recomputed: their reviews remain
    /// addressable and an admin may prune them after deactivation.
    pub async fn recompute(store: &MemoryStore, lot_id: LotId) -> Result<Rating, CoreError> {
        let ratings = ReviewRepo::ratings_for_lot(store, lot_id).await;
        let (average, count) = aggregate_ratings(&ratings);

        let handle = store.lot_handle(lot_id).await.ok_or(CoreError::NotFound {
            entity: "parking lot",
            id: lot_id,
        })?;

        let mut lot = handle.write().await;
        lot.rating = Rating { average, count };
        tracing::debug!(%lot_id, average, count, "Lot rating recomputed");
        Ok(lot.rating)
    }
}
