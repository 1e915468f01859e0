//! Repository for the `ratings` table.

use barter_core::types::{DbId, Score};
use sqlx::PgExecutor;

use crate::models::rating::Rating;

const COLUMNS: &str = "id, user_id, rater_id, score, created_at, updated_at";

/// Provides rating submission and lookup.
pub struct RatingRepo;

impl RatingRepo {
    /// Record `rater_id`'s score for `user_id`, replacing any earlier score
    /// from the same rater.
    pub async fn upsert(
        executor: impl PgExecutor<'_>,
        user_id: DbId,
        rater_id: DbId,
        score: Score,
    ) -> Result<Rating, sqlx::Error> {
        let query = format!(
            "INSERT INTO ratings (user_id, rater_id, score)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_ratings_user_rater
             DO UPDATE SET score = EXCLUDED.score
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Rating>(&query)
            .bind(user_id)
            .bind(rater_id)
            .bind(score)
            .fetch_one(executor)
            .await
    }

    /// Every score received by `user_id`.
    pub async fn scores_for_user(
        executor: impl PgExecutor<'_>,
        user_id: DbId,
    ) -> Result<Vec<Score>, sqlx::Error> {
        sqlx::query_scalar("SELECT score FROM ratings WHERE user_id = $1 ORDER BY id")
            .bind(user_id)
            .fetch_all(executor)
            .await
    }
}
