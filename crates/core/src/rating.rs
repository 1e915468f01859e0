//! User rating rules.
//!
//! A user may rate another user at most once; resubmitting replaces the
//! earlier score. The aggregate stored on the user is always recomputed from
//! every rating row rather than updated incrementally.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{DbId, Score};

pub const MIN_SCORE: Score = 1;
pub const MAX_SCORE: Score = 5;

/// Running mean and count of a user's ratings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingAggregate {
    pub rating: f64,
    pub rating_count: i32,
}

impl RatingAggregate {
    /// Aggregate a complete set of scores. An empty set yields `0.0 / 0`.
    pub fn from_scores(scores: &[Score]) -> Self {
        if scores.is_empty() {
            return Self {
                rating: 0.0,
                rating_count: 0,
            };
        }
        let sum: i64 = scores.iter().map(|&s| i64::from(s)).sum();
        Self {
            rating: sum as f64 / scores.len() as f64,
            rating_count: scores.len() as i32,
        }
    }
}

/// Validate a score is within `MIN_SCORE..=MAX_SCORE`.
pub fn validate_score(score: Score) -> Result<(), CoreError> {
    if (MIN_SCORE..=MAX_SCORE).contains(&score) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Score must be between {MIN_SCORE} and {MAX_SCORE}, got {score}"
        )))
    }
}

/// Users cannot rate themselves.
pub fn validate_rater(rated_user_id: DbId, rater_id: DbId) -> Result<(), CoreError> {
    if rated_user_id == rater_id {
        return Err(CoreError::Validation("You cannot rate yourself".to_string()));
    }
    Ok(())
}
