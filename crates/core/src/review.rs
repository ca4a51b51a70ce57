//! Review entity and validation rules.
//!
//! Reviews feed the cached lot rating through the aggregator; the entity
//! itself is deliberately small. One review per (user, lot) pair is a
//! store-enforced uniqueness invariant.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::{LotId, ReviewId, Timestamp, UserId};

/// Ratings are whole stars from 1 to 5.
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// Comment length bounds.
pub const MIN_COMMENT_LENGTH: u64 = 10;
pub const MAX_COMMENT_LENGTH: u64 = 500;

/// A review of a parking lot by a single user.
#[derive(Debug, Clone, Serialize)]
pub struct Review {
    pub id: ReviewId,
    pub lot_id: LotId,
    pub user_id: UserId,
    pub rating: u8,
    pub title: Option<String>,
    pub comment: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Payload for creating a review. The author comes from the acting
/// identity, the lot from the route.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReview {
    #[validate(range(min = 1, max = 5))]
    pub rating: i64,
    #[validate(length(max = 100))]
    pub title: Option<String>,
    #[validate(length(min = 10, max = 500))]
    pub comment: String,
}

/// Payload for editing a review. Absent fields are left untouched.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateReview {
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i64>,
    #[validate(length(max = 100))]
    pub title: Option<String>,
    #[validate(length(min = 10, max = 500))]
    pub comment: Option<String>,
}

/// Round a raw mean of ratings to one decimal place, the precision the
/// cached lot rating is stored at.
pub fn round_average(raw_mean: f64) -> f64 {
    (raw_mean * 10.0).round() / 10.0
}

/// Mean of a rating set rounded to one decimal; `(0.0, 0)` for an empty set.
pub fn aggregate_ratings(ratings: &[u8]) -> (f64, u32) {
    if ratings.is_empty() {
        return (0.0, 0);
    }
    let sum: u32 = ratings.iter().map(|r| *r as u32).sum();
    let mean = sum as f64 / ratings.len() as f64;
    (round_average(mean), ratings.len() as u32)
}

impl CreateReview {
    /// Validate and narrow the rating to its storage type.
    pub fn checked_rating(&self) -> Result<u8, CoreError> {
        checked_rating(self.rating)
    }
}

fn checked_rating(rating: i64) -> Result<u8, CoreError> {
    if !(MIN_RATING as i64..=MAX_RATING as i64).contains(&rating) {
        return Err(CoreError::Validation(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"
        )));
    }
    Ok(rating as u8)
}

impl UpdateReview {
    pub fn checked_rating(&self) -> Result<Option<u8>, CoreError> {
        self.rating.map(checked_rating).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_of_5_3_4_is_4_point_0() {
        let (average, count) = aggregate_ratings(&[5, 3, 4]);
        assert_eq!(average, 4.0);
        assert_eq!(count, 3);
    }

    #[test]
    fn aggregate_after_removing_the_five_is_3_point_5() {
        let (average, count) = aggregate_ratings(&[3, 4]);
        assert_eq!(average, 3.5);
        assert_eq!(count, 2);
    }

    #[test]
    fn empty_rating_set_resets_to_zero() {
        assert_eq!(aggregate_ratings(&[]), (0.0, 0));
    }

    #[test]
    fn average_rounds_to_one_decimal() {
        // 1 + 2 + 5 = 8 / 3 = 2.666... -> 2.7
        let (average, _) = aggregate_ratings(&[1, 2, 5]);
        assert_eq!(average, 2.7);
    }

    #[test]
    fn rating_outside_1_to_5_is_rejected() {
        let payload = CreateReview {
            rating: 6,
            title: None,
            comment: "long enough comment".to_string(),
        };
        assert!(payload.checked_rating().is_err());
        assert!(validator::Validate::validate(&payload).is_err());
    }

    #[test]
    fn short_comment_is_rejected() {
        let payload = CreateReview {
            rating: 4,
            title: None,
            comment: "too short".to_string(),
        };
        assert!(validator::Validate::validate(&payload).is_err());
    }
}
