//! Repository operations for review rows.
//!
//! The (user, lot) uniqueness invariant is enforced under the review map's
//! write lock, so two concurrent first reviews by the same user race to a
//! single winner and the loser gets `Conflict`.

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use spotwatch_core::error::CoreError;
use spotwatch_core::review::{CreateReview, Review, UpdateReview};
use spotwatch_core::roles::{authorize_review_author, Actor};
use spotwatch_core::types::{LotId, ReviewId};

use crate::memory::MemoryStore;

fn review_not_found(id: ReviewId) -> CoreError {
    CoreError::NotFound {
        entity: "review",
        id,
    }
}

/// Provides review CRUD and the rating aggregation input.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Create a review by the acting identity for the given lot.
    ///
    /// The lot must exist and be active; a second review by the same user
    /// for the same lot fails with `Conflict` and leaves the first one
    /// untouched.
    pub async fn create(
        store: &MemoryStore,
        lot_id: LotId,
        input: CreateReview,
        actor: &Actor,
    ) -> Result<Review, CoreError> {
        input.validate()?;
        let rating = input.checked_rating()?;

        let lot_handle = store.lot_handle(lot_id).await.ok_or(CoreError::NotFound {
            entity: "parking lot",
            id: lot_id,
        })?;
        if !lot_handle.read().await.is_active {
            return Err(CoreError::NotFound {
                entity: "parking lot",
                id: lot_id,
            });
        }

        let mut reviews = store.reviews.write().await;
        let duplicate = reviews
            .values()
            .any(|r| r.lot_id == lot_id && r.user_id == actor.id);
        if duplicate {
            return Err(CoreError::Conflict(
                "You have already reviewed this parking lot".to_string(),
            ));
        }

        let now = Utc::now();
        let review = Review {
            id: Uuid::new_v4(),
            lot_id,
            user_id: actor.id,
            rating,
            title: input.title,
            comment: input.comment,
            created_at: now,
            updated_at: now,
        };
        reviews.insert(review.id, review.clone());
        Ok(review)
    }

    /// Fetch a review by id or fail with `NotFound`.
    pub async fn get(store: &MemoryStore, review_id: ReviewId) -> Result<Review, CoreError> {
        store
            .reviews
            .read()
            .await
            .get(&review_id)
            .cloned()
            .ok_or_else(|| review_not_found(review_id))
    }

    /// All reviews for a lot, newest first.
    pub async fn list_for_lot(store: &MemoryStore, lot_id: LotId) -> Vec<Review> {
        let mut reviews: Vec<Review> = store
            .reviews
            .read()
            .await
            .values()
            .filter(|r| r.lot_id == lot_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        reviews
    }

    /// Author/admin edit of a review.
    pub async fn update(
        store: &MemoryStore,
        review_id: ReviewId,
        input: UpdateReview,
        actor: &Actor,
    ) -> Result<Review, CoreError> {
        input.validate()?;
        let rating = input.checked_rating()?;

        let mut reviews = store.reviews.write().await;
        let review = reviews
            .get_mut(&review_id)
            .ok_or_else(|| review_not_found(review_id))?;
        authorize_review_author(actor, review.user_id)?;

        if let Some(rating) = rating {
            review.rating = rating;
        }
        if let Some(title) = input.title {
            review.title = Some(title);
        }
        if let Some(comment) = input.comment {
            review.comment = comment;
        }
        review.updated_at = Utc::now();

        Ok(review.clone())
    }

    /// Author/admin delete. Returns the removed row so the caller knows
    /// which lot to recompute.
    pub async fn delete(
        store: &MemoryStore,
        review_id: ReviewId,
        actor: &Actor,
    ) -> Result<Review, CoreError> {
        let mut reviews = store.reviews.write().await;
        let review = reviews
            .get(&review_id)
            .ok_or_else(|| review_not_found(review_id))?;
        authorize_review_author(actor, review.user_id)?;

        reviews
            .remove(&review_id)
            .ok_or_else(|| review_not_found(review_id))
    }

    /// Number of reviews for a lot.
    pub async fn count_for_lot(store: &MemoryStore, lot_id: LotId) -> u64 {
        store
            .reviews
            .read()
            .await
            .values()
            .filter(|r| r.lot_id == lot_id)
            .count() as u64
    }

    /// The aggregation primitive: every rating value for a lot.
    pub async fn ratings_for_lot(store: &MemoryStore, lot_id: LotId) -> Vec<u8> {
        store
            .reviews
            .read()
            .await
            .values()
            .filter(|r| r.lot_id == lot_id)
            .map(|r| r.rating)
            .collect()
    }
}
